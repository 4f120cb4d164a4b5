//! `blog-runtime` command line: decorate pages, resolve tags, build cards

use anyhow::{Context, Result};
use blog_core::Language;
use blog_index::{build_article_card, ArticleIndex, ArticleLookup};
use blog_page::Page;
use blog_runtime::{init_logging, LogFormat, PageLoader, RuntimeConfig, FEED_CARD_TYPE};
use blog_taxonomy::{compute_taxonomy, parse_tags, TaxonomyLoader};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Read;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("blog-runtime")
        .version(blog_runtime::VERSION)
        .about("Blog page decoration runtime")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .value_parser(["text", "json"])
                .help("Log output format"),
        )
        .arg(
            Arg::new("content-root")
                .long("content-root")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Serve site resources from this directory"),
        )
        .subcommand(
            Command::new("decorate")
                .about("Load a page document through every phase")
                .arg(
                    Arg::new("input")
                        .default_value("-")
                        .help("Page JSON file, '-' for stdin"),
                )
                .arg(
                    Arg::new("wait-delayed")
                        .long("wait-delayed")
                        .action(ArgAction::SetTrue)
                        .help("Wait for the delayed phase before exiting"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Compute the taxonomy of a tag field")
                .arg(
                    Arg::new("tags")
                        .required(true)
                        .help("Tag field, e.g. \"[Cloud, Security]\""),
                )
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .default_value("en")
                        .value_parser(value_parser!(Language))
                        .help("Taxonomy language"),
                ),
        )
        .subcommand(
            Command::new("card")
                .about("Build the card of an article")
                .arg(Arg::new("path").required(true).help("Article path"))
                .arg(
                    Arg::new("html")
                        .long("html")
                        .action(ArgAction::SetTrue)
                        .help("Output HTML instead of JSON"),
                ),
        )
}

fn load_config(matches: &ArgMatches) -> Result<RuntimeConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RuntimeConfig::default(),
    };
    if let Some(format) = matches.get_one::<String>("log-format") {
        config = config.with_log_format(format.parse::<LogFormat>().map_err(anyhow::Error::msg)?);
    }
    if let Some(root) = matches.get_one::<PathBuf>("content-root") {
        config = config.with_content_root(root);
    }
    Ok(config)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("reading {input}"))
    }
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a String> {
    args.get_one::<String>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

async fn decorate(config: RuntimeConfig, args: &ArgMatches) -> Result<()> {
    let mut page = Page::from_json(&read_input(arg(args, "input")?)?)?;
    let loader = PageLoader::from_config(config)?;
    let load = loader.load(&mut page).await?;
    if args.get_flag("wait-delayed") {
        load.delayed.await?;
    }
    let out = serde_json::json!({ "page": page, "report": load.report });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn resolve(config: RuntimeConfig, args: &ArgMatches) -> Result<()> {
    let language = args
        .get_one::<Language>("lang")
        .copied()
        .unwrap_or_default();
    let store = TaxonomyLoader::new(config.fetcher()?).load(language).await;
    let taxonomy = compute_taxonomy(&parse_tags(arg(args, "tags")?), store.as_ref(), None);
    println!("{}", serde_json::to_string_pretty(&taxonomy)?);
    Ok(())
}

async fn card(config: RuntimeConfig, args: &ArgMatches) -> Result<()> {
    let path = arg(args, "path")?;
    let language = Language::from_path(path);
    let fetcher = config.fetcher()?;
    let taxonomy = TaxonomyLoader::new(fetcher.clone());
    let index = ArticleIndex::new(fetcher.clone(), language).with_page_size(config.index_page_size);
    let (store, indexed) = futures::join!(taxonomy.load(language), index.fetch_all());
    if let Err(e) = indexed {
        tracing::warn!("Query index unavailable: {}", e);
    }
    let article = match index.get(path).await {
        Some(article) => Some(article),
        None => {
            ArticleLookup::new(fetcher)
                .with_cache(config.article_cache())
                .get_blog_article(path, store.as_ref())
                .await
        }
    };
    let mut article = article.with_context(|| format!("article not found: {path}"))?;

    let card = build_article_card(
        &mut article,
        FEED_CARD_TYPE,
        store.as_ref(),
        language.date_locale(path),
    );
    if args.get_flag("html") {
        println!("{}", card.to_html());
    } else {
        println!("{}", serde_json::to_string_pretty(&card)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let config = load_config(&matches)?;
    init_logging(&config.logging)?;

    match matches.subcommand() {
        Some(("decorate", args)) => decorate(config, args).await,
        Some(("resolve", args)) => resolve(config, args).await,
        Some(("card", args)) => card(config, args).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let matches = cli()
            .try_get_matches_from(["blog-runtime", "resolve", "[Cloud]", "--log-format", "json"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "resolve");
        assert_eq!(args.get_one::<Language>("lang"), Some(&Language::En));
    }
}
