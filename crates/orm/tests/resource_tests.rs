//! End-to-end tests for the ORM bootstrap resource: options in, entity
//! manager and exported settings out.

use ormstrap_cache::CacheKind;
use ormstrap_core::{Bootstrap, ParameterBag, ParameterSink};
use ormstrap_orm::{
    EntityManager, MappingFormat, OrmOptions, OrmResource, ENTITY_MANAGER_ATTRIBUTE, REGISTRY_KEY,
};
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn reference_options() -> OrmOptions {
    serde_json::from_value(json!({
        "metadata": {"driver": "yaml", "mappingPaths": ["/a"], "entitiesPaths": ["/b"]},
        "cache": "apc",
        "proxy": {},
        "connection": {"driver": "pdo_sqlite", "path": ":memory:"}
    }))
    .unwrap()
}

#[test]
fn test_reference_bootstrap() {
    let bootstrap = Bootstrap::new("/srv/app");
    let em = bootstrap.bootstrap(&OrmResource::new(reference_options())).unwrap();

    let published = bootstrap
        .container()
        .get::<EntityManager>(ENTITY_MANAGER_ATTRIBUTE)
        .unwrap();
    assert!(Arc::ptr_eq(&em, &published));

    assert_eq!(
        bootstrap.registry().get(REGISTRY_KEY),
        Some(json!({
            "doctrine.orm.mapping_paths": ["/a"],
            "doctrine.orm.entities_paths": ["/b"]
        }))
    );

    let config = em.configuration();
    let driver = config.metadata_driver_impl().unwrap();
    assert_eq!(driver.format(), MappingFormat::Yaml);
    assert_eq!(driver.paths(), &[PathBuf::from("/a")]);

    let metadata_cache = config.metadata_cache_impl().unwrap();
    assert_eq!(metadata_cache.kind(), CacheKind::Apc);
    assert!(Arc::ptr_eq(metadata_cache, config.query_cache_impl().unwrap()));

    assert_eq!(config.proxy_dir(), Some(Path::new("/srv/app/data/doctrine2/Proxies")));
    assert_eq!(config.proxy_namespace(), Some("Proxies"));
    assert_eq!(em.connection().params().get_str("path").as_deref(), Some(":memory:"));
}

#[test]
fn test_parameter_sink_replaces_registry() {
    let parameters = Arc::new(ParameterBag::new());
    let bootstrap = Bootstrap::new("/srv/app").with_parameters(parameters.clone());

    bootstrap.bootstrap(&OrmResource::new(reference_options())).unwrap();

    assert_eq!(parameters.parameter("doctrine.orm.mapping_paths"), Some(json!(["/a"])));
    assert_eq!(parameters.parameter("doctrine.orm.entities_paths"), Some(json!(["/b"])));
    assert!(bootstrap.registry().is_empty());
}

#[test]
fn test_second_init_replaces_published_session() {
    let bootstrap = Bootstrap::new("/srv/app");
    let resource = OrmResource::new(reference_options());

    let first = bootstrap.bootstrap(&resource).unwrap();
    let second = bootstrap.bootstrap(&resource).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    let published = bootstrap
        .container()
        .get::<EntityManager>(ENTITY_MANAGER_ATTRIBUTE)
        .unwrap();
    assert!(Arc::ptr_eq(&second, &published));
    assert_eq!(bootstrap.container().len(), 1);
}

#[test]
fn test_resource_from_application_config() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    write!(
        file,
        r#"
frontController:
  controllerDirectory: /srv/app/controllers
doctrine2:
  metadata:
    driver: xml
    mappingPaths: [/srv/app/mappings]
  cache: memcache
  proxy:
    directory: /tmp/proxies
    namespace: App\Proxies
  connection:
    driver: pdo_sqlite
    memory: true
"#
    )
    .unwrap();

    let resource = OrmResource::from_file(file.path(), "doctrine2").unwrap();
    let em = Bootstrap::new("/srv/app").bootstrap(&resource).unwrap();

    let config = em.configuration();
    assert_eq!(config.metadata_driver_impl().unwrap().format(), MappingFormat::Xml);
    assert_eq!(config.metadata_cache_impl().unwrap().kind(), CacheKind::Memcache);
    assert_eq!(config.proxy_dir(), Some(Path::new("/tmp/proxies")));
    assert_eq!(config.proxy_namespace(), Some("App\\Proxies"));
}

#[test]
fn test_entity_classes_from_annotation_sources() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("Entities")).unwrap();
    std::fs::write(dir.path().join("Entities/User.php"), "/** @Entity */ class User {}").unwrap();

    let options: OrmOptions = serde_json::from_value(json!({
        "metadata": {"mappingPaths": [dir.path()]},
        "connection": {"driver": "pdo_sqlite", "memory": true}
    }))
    .unwrap();

    let em = Bootstrap::new(dir.path()).bootstrap(&OrmResource::new(options)).unwrap();
    assert_eq!(em.metadata_driver().unwrap().format(), MappingFormat::Annotation);
    assert_eq!(em.entity_class_names().unwrap(), vec!["Entities\\User".to_string()]);
}

#[tokio::test]
async fn test_published_session_connects() {
    let bootstrap = Bootstrap::new("/srv/app");
    bootstrap.bootstrap(&OrmResource::new(reference_options())).unwrap();

    let em = bootstrap
        .container()
        .get::<EntityManager>(ENTITY_MANAGER_ATTRIBUTE)
        .unwrap();
    let pool = em.connect().await.unwrap();
    sqlx::query("SELECT 1").execute(&pool).await.unwrap();
    pool.close().await;
}
