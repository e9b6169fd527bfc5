//! Prints one frame of the browser: the directory tree on the left, the
//! selected directory's contents on the right

use anyhow::{Context, Result};
use asset_core::{AssetBrowser, BrowserConfig, BrowserServices, NotificationLevel, PathMetadata};

pub fn run(config: BrowserConfig, filter: Option<&str>) -> Result<()> {
    let asset_dir = config.project.asset_directory.clone();
    std::fs::create_dir_all(&asset_dir)
        .with_context(|| format!("Failed to create asset directory {}", asset_dir.display()))?;

    let mut browser = AssetBrowser::new(config, BrowserServices::default())
        .with_context(|| format!("Failed to scan {}", asset_dir.display()))?;
    tracing::info!("Loaded {} paths from {}", browser.tree().len(), asset_dir.display());

    if let Some(filter) = filter {
        browser.set_text_filter(filter);
    }

    println!("{}", asset_dir.display());
    for row in browser.directory_tree_rows() {
        let marker = match (row.is_leaf, row.is_expanded) {
            (true, _) => ' ',
            (false, true) => 'v',
            (false, false) => '>',
        };
        println!("{}{} {}", "  ".repeat(row.depth), marker, row.name);
    }

    println!();
    let crumbs: Vec<String> = browser.breadcrumbs().into_iter().map(|c| c.name).collect();
    println!("[{}]", crumbs.join(" > "));
    if browser.is_any_filter_active() {
        println!("filter: {}", browser.text_filter().input());
    }

    for path in browser.visible_paths() {
        let Some(record) = browser.get(&path) else {
            continue;
        };
        println!("  {:<40} {}", label(record), kind_name(&browser, record));
    }

    for notification in browser.take_notifications() {
        match notification.level {
            NotificationLevel::Info => println!("info: {}", notification.message),
            NotificationLevel::Warning => eprintln!("warning: {}", notification.message),
            NotificationLevel::Error => eprintln!("error: {}", notification.message),
        }
    }

    Ok(())
}

fn label(record: &PathMetadata) -> String {
    if record.is_directory() {
        format!("{}/", record.name())
    } else {
        record.name().to_string()
    }
}

fn kind_name(browser: &AssetBrowser, record: &PathMetadata) -> String {
    browser
        .path_details(record.path())
        .map(|d| d.kind_name)
        .unwrap_or_default()
}
