use colored::Colorize;

use trellis_content::RecoveryAction;
use trellis_types::{Category, CategoryId, NameKey, Post, Slug};

use crate::cli::*;
use crate::config::PlatformConfig;
use crate::platform::{Platform, PlatformError};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        config: config_path,
        format,
    } = cli;
    let config = PlatformConfig::load(&config_path)?;
    let platform = Platform::open(&config);

    match command {
        Command::Init => cmd_init(&config_path, &config, &platform),
        Command::Recover => cmd_recover(&platform),
        Command::Category(cmd) => match cmd {
            CategoryCommand::List => cmd_category_list(&format, &platform),
            CategoryCommand::Create { name, parent } => {
                cmd_category_create(&platform, &name, parent)
            }
            CategoryCommand::Rename { id, name } => cmd_category_rename(&platform, &id, &name),
            CategoryCommand::Move { id, parent } => cmd_category_move(&platform, &id, parent),
            CategoryCommand::Delete { id } => cmd_category_delete(&platform, &id),
            CategoryCommand::Reorder { parent, ids } => {
                cmd_category_reorder(&platform, parent, &ids)
            }
        },
        Command::Post(cmd) => match cmd {
            PostCommand::List => cmd_post_list(&format, &platform),
            PostCommand::Add {
                slug,
                title,
                category,
                draft,
            } => cmd_post_add(&config, &platform, &slug, &title, category, draft),
            PostCommand::Show { slug } => cmd_post_show(&format, &platform, &slug),
            PostCommand::Remove { slug } => cmd_post_remove(&platform, &slug),
        },
    }
}

// ---------------------------------------------------------------
// Error surfacing
// ---------------------------------------------------------------

/// Validation errors keep their specific message; storage errors collapse
/// to a generic one with the cause logged, never shown.
fn surface(err: PlatformError) -> anyhow::Error {
    if err.is_validation() {
        anyhow::anyhow!("{err}")
    } else {
        tracing::error!(cause = %err, "storage failure");
        anyhow::anyhow!("operation failed")
    }
}

fn parse_id(raw: &str) -> anyhow::Result<CategoryId> {
    Ok(CategoryId::parse(raw)?)
}

// ---------------------------------------------------------------
// init / recover
// ---------------------------------------------------------------

fn cmd_init(
    config_path: &std::path::Path,
    config: &PlatformConfig,
    platform: &Platform,
) -> anyhow::Result<()> {
    if !config_path.exists() {
        std::fs::write(config_path, config.to_toml()?)?;
        println!("{} wrote {}", "✓".green(), config_path.display().to_string().bold());
    }

    // Materialize the category file (synthesizes the default category) and
    // bring the post collection into a consistent state.
    let categories = platform
        .categories()
        .store()
        .write(Vec::new())
        .map_err(|e| surface(e.into()))?;
    let report = platform.recover().map_err(surface)?;

    println!(
        "{} Initialized trellis data in {}",
        "✓".green().bold(),
        config.data_dir.display().to_string().bold()
    );
    if let Some(default) = categories.first() {
        println!("  Default category: {}", default.name.yellow());
    }
    println!("  Posts: {}", report.posts.to_string().bold());
    Ok(())
}

fn cmd_recover(platform: &Platform) -> anyhow::Result<()> {
    let report = platform.recover().map_err(surface)?;
    let what = match report.action {
        RecoveryAction::Indexed => "index and shards already consistent".to_string(),
        RecoveryAction::Split => format!("split index into {} shards", report.posts),
        RecoveryAction::Rebuilt => format!("rebuilt index from {} shards", report.posts),
        RecoveryAction::Initialized => "initialized empty index".to_string(),
    };
    println!("{} {}", "✓".green().bold(), what);
    Ok(())
}

// ---------------------------------------------------------------
// category
// ---------------------------------------------------------------

fn cmd_category_list(format: &OutputFormat, platform: &Platform) -> anyhow::Result<()> {
    let list = platform.list_categories().map_err(surface)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&list)?),
        OutputFormat::Text => {
            let mut roots: Vec<&Category> = list.iter().filter(|c| c.parent.is_none()).collect();
            roots.sort_by_key(|c| c.order);
            for root in roots {
                print_category(root, &list, 0);
            }
        }
    }
    Ok(())
}

fn print_category(node: &Category, list: &[Category], depth: usize) {
    println!(
        "{}{}  {}",
        "  ".repeat(depth),
        node.name.yellow(),
        node.id.to_string().dimmed()
    );
    let mut children: Vec<&Category> = list
        .iter()
        .filter(|c| c.parent.as_ref() == Some(&node.id))
        .collect();
    children.sort_by_key(|c| c.order);
    for child in children {
        print_category(child, list, depth + 1);
    }
}

fn cmd_category_create(
    platform: &Platform,
    name: &str,
    parent: Option<String>,
) -> anyhow::Result<()> {
    let parent = parent.as_deref().map(parse_id).transpose()?;
    let created = platform
        .categories()
        .create(name, parent)
        .map_err(|e| surface(e.into()))?;
    println!(
        "{} Created {} ({})",
        "✓".green().bold(),
        created.name.yellow(),
        created.id.to_string().dimmed()
    );
    Ok(())
}

fn cmd_category_rename(platform: &Platform, id: &str, name: &str) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let (update, rewritten) = platform.rename_category(&id, name).map_err(surface)?;
    println!(
        "{} Renamed {} → {}",
        "✓".green().bold(),
        update.previous_name.yellow(),
        update.category.name.yellow().bold()
    );
    if rewritten > 0 {
        println!("  {} post(s) retagged", rewritten.to_string().bold());
    }
    Ok(())
}

fn cmd_category_move(
    platform: &Platform,
    id: &str,
    parent: Option<String>,
) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let parent = parent.as_deref().map(parse_id).transpose()?;
    let update = platform.move_category(&id, parent).map_err(surface)?;
    let target = match &update.category.parent {
        Some(p) => p.to_string(),
        None => "root".to_string(),
    };
    println!(
        "{} Moved {} under {}",
        "✓".green().bold(),
        update.category.name.yellow(),
        target.bold()
    );
    Ok(())
}

fn cmd_category_delete(platform: &Platform, id: &str) -> anyhow::Result<()> {
    let id = parse_id(id)?;
    let (deleted, rewritten) = platform.delete_category(&id).map_err(surface)?;
    println!(
        "{} Deleted {}",
        "✓".green().bold(),
        deleted.previous_name.yellow()
    );
    if rewritten > 0 {
        println!(
            "  {} post(s) moved to {}",
            rewritten.to_string().bold(),
            deleted.default_name.yellow()
        );
    }
    Ok(())
}

fn cmd_category_reorder(
    platform: &Platform,
    parent: Option<String>,
    ids: &[String],
) -> anyhow::Result<()> {
    let parent = parent.as_deref().map(parse_id).transpose()?;
    let ordered: Vec<CategoryId> = ids
        .iter()
        .map(|raw| parse_id(raw))
        .collect::<anyhow::Result<_>>()?;
    platform
        .categories()
        .reorder(parent.as_ref(), &ordered)
        .map_err(|e| surface(e.into()))?;
    println!("{} Reordered {} sibling(s)", "✓".green().bold(), ordered.len());
    Ok(())
}

// ---------------------------------------------------------------
// post
// ---------------------------------------------------------------

fn cmd_post_list(format: &OutputFormat, platform: &Platform) -> anyhow::Result<()> {
    let posts = platform.posts().read_all().map_err(|e| surface(e.into()))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&posts)?),
        OutputFormat::Text => {
            if posts.is_empty() {
                println!("No posts.");
            }
            for post in &posts {
                let draft = if post.draft { " [draft]".dimmed().to_string() } else { String::new() };
                println!(
                    "{}  {}  {}{}",
                    post.slug.to_string().bold(),
                    post.title,
                    post.category.yellow(),
                    draft
                );
            }
        }
    }
    Ok(())
}

fn cmd_post_add(
    config: &PlatformConfig,
    platform: &Platform,
    slug: &str,
    title: &str,
    category: Option<String>,
    draft: bool,
) -> anyhow::Result<()> {
    let slug = Slug::parse(slug)?;
    let category = category.unwrap_or_else(|| config.default_category.clone());

    // The reference is by name; an unknown category is legal but worth a
    // heads-up, since only the default ever gets synthesized.
    let known = platform
        .list_categories()
        .map_err(surface)?
        .iter()
        .any(|c| c.name_key() == NameKey::of(&category));
    if !known {
        println!(
            "{} no category named {:?} exists yet",
            "warning:".yellow().bold(),
            category
        );
    }

    let mut post = Post::new(slug, title, category);
    post.draft = draft;
    let post = platform.posts().insert(post).map_err(|e| surface(e.into()))?;
    println!(
        "{} Added {} ({})",
        "✓".green().bold(),
        post.slug.to_string().bold(),
        post.category.yellow()
    );
    Ok(())
}

fn cmd_post_show(format: &OutputFormat, platform: &Platform, slug: &str) -> anyhow::Result<()> {
    let slug = Slug::parse(slug)?;
    let post = platform
        .posts()
        .read(&slug)
        .map_err(|e| surface(e.into()))?
        .ok_or_else(|| anyhow::anyhow!("post not found: {slug}"))?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&post)?),
        OutputFormat::Text => {
            println!("{}  {}", post.slug.to_string().bold(), post.category.yellow());
            println!("  {}", post.title);
            println!("  created {}", post.created_at.to_rfc3339().dimmed());
            if let Some(updated) = post.updated_at {
                println!("  updated {}", updated.to_rfc3339().dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_post_remove(platform: &Platform, slug: &str) -> anyhow::Result<()> {
    let slug = Slug::parse(slug)?;
    let removed = platform.posts().remove(&slug).map_err(|e| surface(e.into()))?;
    println!("{} Removed {}", "✓".green().bold(), removed.slug.to_string().bold());
    Ok(())
}
