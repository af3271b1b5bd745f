use blogmap::{assemble, config, history, output, render, scan, sync};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        // clap wants a 'static str; one small leak at startup
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "blogmap")]
#[command(about = "Sitemap and RSS feed generator for a git-backed blog")]
#[command(long_about = "\
Sitemap and RSS feed generator for a git-backed blog

The blog is a single-page application served from a plain git repository;
every non-root page is a client-side route behind a /#! marker. blogmap
clones (or updates) the content repository, maps its working tree to the
canonical URL of every public page, reads each page's last-modified time
from git history, and writes sitemap.xml plus feed.xml. A second, simpler
pass does the same for the netdisk mirror repository.

Expected repository layout:

  repo/
  ├── index.html            # SPA shell → /
  ├── home.html             # duplicate of index.html, never published
  ├── about.html            # → /#!/about
  ├── category.html         # → /#!/category
  └── posts/
      ├── index.json        # post listing the SPA renders / and /category from
      └── 2024/hello.md     # → /#!/posts/2024/hello.md

Run 'blogmap gen-config' to print a documented blogmap.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "blogmap.toml", global = true)]
    config: PathBuf,

    /// Override run.dir from the config
    #[arg(long, global = true)]
    run_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync repositories, then write sitemap, feed and netdisk sitemap
    Build {
        /// Use the existing checkouts without contacting the remotes
        #[arg(long)]
        no_sync: bool,
    },
    /// Scan and assemble the main set without writing any document
    Plan,
    /// Validate config and environment without building
    Check,
    /// Print a stock blogmap.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = config::load_config(&cli.config)?;
    if let Some(dir) = cli.run_dir {
        config.run.dir = dir;
    }
    config.validate()?;

    let timeout = Duration::from_secs(config.history.timeout_secs);
    let current_year = chrono::Utc::now().year();

    match cli.command {
        Command::Build { no_sync } => {
            // A broken git environment should fail here, not after a
            // half-finished crawl of the tree
            history::probe(timeout)?;
            std::fs::create_dir_all(&config.run.dir)?;

            let blog_dir = config.blog_repo_dir();
            let netdisk_dir = config.netdisk_repo_dir();

            if !no_sync {
                println!("==> Syncing {}", config.blog.repo);
                sync::sync_repo(&config.blog.repo, &blog_dir, timeout)?;
                println!("==> Syncing {}", config.netdisk.repo);
                sync::sync_repo(&config.netdisk.repo, &netdisk_dir, timeout)?;
            }

            println!("==> Scanning {}", blog_dir.display());
            let listing = scan::scan(&blog_dir)?;
            output::print_scan(&listing);

            println!("==> Assembling urls");
            let mut blog_history = history::GitHistory::new(&blog_dir, timeout);
            let set =
                assemble::build_main_set(&listing.files, &blog_dir, &mut blog_history, current_year);
            let feed = assemble::feed_entries(&set.entries);

            println!("==> Scanning {}", netdisk_dir.display());
            let netdisk_listing = scan::scan(&netdisk_dir)?;
            let mut netdisk_history = history::GitHistory::new(&netdisk_dir, timeout);
            let netdisk = assemble::build_netdisk_set(&netdisk_listing.files, &mut netdisk_history);

            let sitemap = render::sitemap_xml(set.entries.values(), &config.blog.url);
            let feed_url = format!("{}/{}", config.blog.url, config.run.feed);
            let feed_doc =
                render::feed_xml(&feed, &config.feed, &config.blog.url, &feed_url, current_year)?;
            let netdisk_doc = render::netdisk_sitemap_xml(&netdisk, &config.netdisk.url);

            let sitemap_path = config.sitemap_path();
            let feed_path = config.feed_path();
            let netdisk_path = config.netdisk_sitemap_path();
            render::write_atomic(&sitemap_path, &sitemap)?;
            render::write_atomic(&feed_path, &feed_doc)?;
            render::write_atomic(&netdisk_path, &netdisk_doc)?;

            let feed_count = feed.len();
            output::print_build_report(
                &set,
                feed_count,
                &netdisk,
                &[
                    sitemap_path.as_path(),
                    feed_path.as_path(),
                    netdisk_path.as_path(),
                ],
            );
            println!("==> Done");
        }
        Command::Plan => {
            history::probe(timeout)?;
            std::fs::create_dir_all(&config.run.dir)?;
            let blog_dir = config.blog_repo_dir();

            println!("==> Scanning {}", blog_dir.display());
            let listing = scan::scan(&blog_dir)?;

            let mut blog_history = history::GitHistory::new(&blog_dir, timeout);
            let set =
                assemble::build_main_set(&listing.files, &blog_dir, &mut blog_history, current_year);
            output::print_plan(&set);

            let plan_path = config.run.dir.join("plan.json");
            let json = serde_json::to_string_pretty(&set.entries)?;
            render::write_atomic(&plan_path, &json)?;
            println!("==> Wrote {}", plan_path.display());
        }
        Command::Check => {
            history::probe(timeout)?;
            println!("config ok: {}", cli.config.display());
            for (name, dir) in [
                ("blog", config.blog_repo_dir()),
                ("netdisk", config.netdisk_repo_dir()),
            ] {
                if dir.is_dir() {
                    println!("{name} checkout present: {}", dir.display());
                } else {
                    println!(
                        "{name} checkout missing (a build will clone it): {}",
                        dir.display()
                    );
                }
            }
            println!("==> Environment is usable");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
