use std::fmt::Write;
use std::fs;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use archive_timeline::{build_archive, Timeline};
use article_filter::{ArticleFilter, FilterResult, FilterState, PageItem};
use blog_common::{
    collect_tags, parse_posts, parse_tag_list, BlogError, CategoryTree, PostSummary, ViewConfig,
    ViewState, ALL,
};

fn cli() -> Command {
    let posts_arg = Arg::new("posts")
        .short('p')
        .long("posts")
        .value_name("POSTS_JSON")
        .help("后端返回的文章列表 JSON 文件")
        .required(true);
    let json_arg = Arg::new("json")
        .long("json")
        .help("以 JSON 输出视图状态")
        .action(ArgAction::SetTrue);

    Command::new("blog-inspect")
        .version(env!("CARGO_PKG_VERSION"))
        .about("预览博客归档时间线与文章列表筛选结果")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("CONFIG_JSON")
            .help("视图配置 JSON 文件")
            .global(true))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("显示调试日志")
            .action(ArgAction::SetTrue)
            .global(true))
        .subcommand(Command::new("timeline")
            .about("按年月输出归档时间线")
            .arg(posts_arg.clone())
            .arg(json_arg.clone()))
        .subcommand(Command::new("list")
            .about("按分类、标签、关键字筛选并分页")
            .arg(posts_arg)
            .arg(json_arg)
            .arg(Arg::new("categories")
                .long("categories")
                .value_name("CATEGORIES_JSON")
                .help("分类树 JSON 文件，缺省使用内置分类"))
            .arg(Arg::new("tags")
                .long("tags")
                .value_name("TAGS_JSON")
                .help("已知标签列表 JSON 文件，缺省从文章中收集"))
            .arg(Arg::new("parent").long("parent").value_name("ID").default_value(ALL))
            .arg(Arg::new("sub").long("sub").value_name("ID").default_value(ALL))
            .arg(Arg::new("tag").long("tag").value_name("NAME").default_value(ALL))
            .arg(Arg::new("keyword").short('k').long("keyword").value_name("TEXT").default_value(""))
            .arg(Arg::new("page")
                .long("page")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("1"))
            .arg(Arg::new("page_size")
                .long("page-size")
                .value_name("N")
                .help("覆盖配置中的每页条数")
                .value_parser(value_parser!(usize))))
}

// 主函数
fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("timeline", sub)) => run_timeline(sub),
        Some(("list", sub)) => run_list(sub),
        _ => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}

/// RUST_LOG 优先，否则默认 warn，-v 提升到 debug
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<ViewConfig, BlogError> {
    match matches.get_one::<String>("config") {
        Some(path) => {
            debug!(path = %path, "读取视图配置");
            ViewConfig::from_json(&fs::read_to_string(path)?)
        }
        None => Ok(ViewConfig::default()),
    }
}

fn load_posts(matches: &ArgMatches) -> Result<Vec<PostSummary>, BlogError> {
    let path = matches
        .get_one::<String>("posts")
        .ok_or_else(|| BlogError::InvalidConfig("缺少 --posts 参数".to_string()))?;
    let posts = parse_posts(&fs::read_to_string(path)?)?;
    info!(path = %path, count = posts.len(), "文章列表已加载");
    Ok(posts)
}

fn print_view<T: serde::Serialize>(view: &ViewState<T>) -> Result<(), BlogError> {
    let json = serde_json::to_string_pretty(view).map_err(|e| BlogError::json("视图状态", e))?;
    println!("{}", json);
    Ok(())
}

fn run_timeline(matches: &ArgMatches) -> Result<(), BlogError> {
    let config = load_config(matches)?;
    let posts = load_posts(matches)?;
    let view = build_archive(&posts, &config);

    if matches.get_flag("json") {
        return print_view(&view);
    }
    print!("{}", render_timeline(&view));
    Ok(())
}

fn run_list(matches: &ArgMatches) -> Result<(), BlogError> {
    let mut config = load_config(matches)?;
    if let Some(size) = matches.get_one::<usize>("page_size") {
        config.page_size = *size;
        config.validate()?;
    }
    let posts = load_posts(matches)?;

    let categories = match matches.get_one::<String>("categories") {
        Some(path) => CategoryTree::from_json(&fs::read_to_string(path)?)?,
        None => CategoryTree::fallback(),
    };
    let known_tags = match matches.get_one::<String>("tags") {
        Some(path) => parse_tag_list(&fs::read_to_string(path)?)?,
        None => collect_tags(&posts),
    };

    let mut state = FilterState::new(config.page_size);
    let arg = |name: &str| matches.get_one::<String>(name).map(String::as_str).unwrap_or(ALL);
    state.set_parent(arg("parent"));
    state.set_sub(arg("sub"));
    state.set_tag(arg("tag"));
    state.set_keyword(matches.get_one::<String>("keyword").map(String::as_str).unwrap_or(""));
    if state.reconcile_tag(&known_tags) {
        eprintln!("提示: 标签不存在，已重置为全部");
    }
    state.current_page = matches.get_one::<usize>("page").copied().unwrap_or(1);

    let view = ArticleFilter::view(&posts, &state, &categories);
    if matches.get_flag("json") {
        return print_view(&view);
    }
    print!("{}", render_list(&view));
    Ok(())
}

/// 文本形式的归档时间线
fn render_timeline(view: &ViewState<Timeline>) -> String {
    let mut out = String::new();
    let timeline = match view {
        ViewState::Ready(timeline) => timeline,
        _ => {
            out.push_str("暂无归档文章\n");
            return out;
        }
    };

    let _ = writeln!(out, "共 {} 篇文章", timeline.total);
    for year in &timeline.years {
        let _ = writeln!(out, "\n{} ({})", year.year, year.count);
        for month in &year.months {
            let anchor = month.anchor.as_deref().unwrap_or("-");
            let _ = writeln!(out, "  {} [{}]", month.label, anchor);
            for entry in &month.entries {
                let _ = writeln!(out, "    {}  {}", entry.display_date, entry.post.title);
            }
        }
    }

    if !timeline.shortcuts.is_empty() {
        let labels: Vec<String> = timeline
            .shortcuts
            .iter()
            .map(|s| format!("{}({})", s.label, s.count))
            .collect();
        let _ = writeln!(out, "\n快速跳转: {}", labels.join(" "));
    }
    out
}

/// 文本形式的文章列表与页码控件
fn render_list(view: &ViewState<FilterResult>) -> String {
    let mut out = String::new();
    let result = match view {
        ViewState::Ready(result) => result,
        _ => {
            out.push_str("没有符合条件的文章\n");
            return out;
        }
    };

    let _ = writeln!(out, "共 {} 篇，第 {}/{} 页", result.total, result.page, result.total_pages);
    for post in &result.items {
        let _ = writeln!(out, "- [{}] {}  ({} / {})", post.id, post.title, post.parent_category, post.category);
        let summary = post.summary_text();
        if !summary.is_empty() {
            let _ = writeln!(out, "    {}", summary);
        }
    }

    let controls: Vec<String> = result
        .pages
        .iter()
        .map(|item| match item {
            PageItem::Page(n) if *n == result.page => format!("[{}]", n),
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "…".to_string(),
        })
        .collect();
    let _ = writeln!(out, "{}", controls.join(" "));
    out
}
