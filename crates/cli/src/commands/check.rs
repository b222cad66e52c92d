use anyhow::Context;
use ormstrap_core::Bootstrap;
use ormstrap_orm::{EntityManager, OrmResource, REGISTRY_KEY};
use serde_json::{json, Value};
use std::path::PathBuf;

pub struct CheckArgs {
    pub file: PathBuf,
    pub section: String,
    pub app_path: PathBuf,
    pub connect: bool,
    pub json: bool,
}

pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let resource = OrmResource::from_file(&args.file, &args.section)
        .with_context(|| format!("Failed to read options from {}", args.file.display()))?;

    let bootstrap = Bootstrap::new(&args.app_path);
    let em = bootstrap
        .bootstrap(&resource)
        .context("ORM bootstrap failed")?;

    let mut report = build_report(&em, bootstrap.registry().get(REGISTRY_KEY));

    if args.connect {
        let pool = em.connect().await.context("Could not open the database connection")?;
        pool.close().await;
        report["connected"] = json!(true);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn build_report(em: &EntityManager, exported: Option<Value>) -> Value {
    let config = em.configuration();
    let driver = em.metadata_driver();

    let entities = match em.entity_class_names() {
        Ok(classes) => json!(classes),
        Err(e) => {
            tracing::warn!("Could not list mapped classes: {}", e);
            Value::Null
        }
    };

    json!({
        "metadata_driver": driver.map(|d| d.format().name()),
        "mapping_paths": driver.map(|d| d.paths().to_vec()).unwrap_or_default(),
        "cache": config.metadata_cache_impl().map(|c| c.kind().name()),
        "proxy_dir": config.proxy_dir(),
        "proxy_namespace": config.proxy_namespace(),
        "connection_driver": em.connection().driver().map(|d| d.name()),
        "exported": exported,
        "entities": entities,
    })
}

fn print_report(report: &Value) {
    let field = |key: &str| match &report[key] {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    };

    println!("Metadata driver:  {}", field("metadata_driver"));
    println!("Mapping paths:    {}", field("mapping_paths"));
    println!("Cache:            {}", field("cache"));
    println!("Proxy directory:  {}", field("proxy_dir"));
    println!("Proxy namespace:  {}", field("proxy_namespace"));
    println!("Connection:       {}", field("connection_driver"));
    if let Value::Array(entities) = &report["entities"] {
        println!("Entities ({}):", entities.len());
        for entity in entities {
            println!("  - {}", entity.as_str().unwrap_or_default());
        }
    }
    if report["connected"] == json!(true) {
        println!("✓ Database connection opened");
    }
}
