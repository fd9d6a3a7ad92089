use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use flexi_logger::{FileSpec, Logger, LoggerHandle};

use steply_paged::core::{FetchError, ListOptions, ScrollHost};
use steply_paged::task::PageRequest;
use steply_paged::terminal::{HostKey, Terminal, TerminalEvent, Viewport};
use steply_paged::widgets::infinite_list::{InfiniteList, InfiniteListBuilder, ListStatus};

#[derive(Parser, Debug)]
#[command(
    name = "steply-paged",
    about = "Scroll through an infinitely loading list in the terminal"
)]
struct Args {
    /// List options as YAML, or JSON when the file ends in `.json`.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
    /// Overrides `items_per_page` from the config file.
    #[arg(long)]
    items_per_page: Option<usize>,
    /// Overrides `threshold` from the config file, in rows.
    #[arg(long)]
    threshold: Option<f64>,
    #[arg(long, default_value_t = 200)]
    total: usize,
    /// Fetch pages on a worker thread instead of revealing a local list.
    #[arg(long)]
    deferred: bool,
    #[arg(long, default_value_t = 300)]
    latency_ms: u64,
    /// Make the fetch for this page fail.
    #[arg(long)]
    fail_at_page: Option<usize>,
    #[arg(long, default_value = "info")]
    log_level: String,
    #[arg(long, default_value = "steply-paged.log")]
    log_file: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let _logger = init_logging(&args.log_level, &args.log_file)?;
    let mut options = load_options(args.config.as_deref())?;
    if let Some(items_per_page) = args.items_per_page {
        options.items_per_page = items_per_page;
    }
    if let Some(threshold) = args.threshold {
        options.threshold = threshold;
    }
    options.validate()?;
    log::info!(
        "starting: total={} deferred={} page_size={}",
        args.total,
        args.deferred,
        options.items_per_page
    );

    let host = ScrollHost::new();
    let mut terminal = Terminal::new()?;
    let rows = body_height(terminal.size().height);
    host.attach_container(Viewport::new(rows).metrics(0));

    let mut list = build_list(&args, options)?.mount(&host)?;
    terminal.enter()?;
    let result = event_loop(&mut terminal, &host, &mut list);
    terminal.leave()?;
    list.unmount();
    result
}

fn init_logging(level: &str, path: &Path) -> anyhow::Result<LoggerHandle> {
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let basename = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("steply-paged")
        .to_string();
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(directory)
                .basename(basename)
                .suppress_timestamp(),
        )
        .start()?;
    Ok(handle)
}

fn load_options(path: Option<&Path>) -> anyhow::Result<ListOptions> {
    let Some(path) = path else {
        return Ok(ListOptions::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let options = if is_json {
        ListOptions::from_json_str(&source)
    } else {
        ListOptions::from_yaml_str(&source)
    };
    options.with_context(|| format!("loading options from {}", path.display()))
}

fn label(index: usize) -> String {
    format!("Item {index}")
}

fn build_list(
    args: &Args,
    options: ListOptions,
) -> anyhow::Result<InfiniteListBuilder<String, String>> {
    let builder = InfiniteList::builder()
        .with_options(options)
        .with_render_item(|item: &String, index: usize| format!("{:>6}  {item}", index + 1))
        .with_loading_component("  loading...".to_string())
        .with_end_message("  (end of list)".to_string());

    if !args.deferred {
        let items = (1..=args.total).map(label).collect();
        return Ok(builder.with_items(items));
    }

    let total = args.total;
    let latency = Duration::from_millis(args.latency_ms);
    let fail_at = args.fail_at_page;
    let fetch = move |request: PageRequest| -> Result<Vec<String>, FetchError> {
        thread::sleep(latency);
        if fail_at == Some(request.page) {
            return Err(FetchError::failed(format!("page {} unavailable", request.page)));
        }
        let start = request.page.saturating_sub(1) * request.page_size;
        let end = (start + request.page_size).min(total);
        Ok((start..end).map(|i| label(i + 1)).collect())
    };
    Ok(builder.with_fetch_page(fetch))
}

fn body_height(terminal_height: u16) -> usize {
    usize::from(terminal_height.saturating_sub(2)).max(1)
}

fn event_loop(
    terminal: &mut Terminal,
    host: &ScrollHost,
    list: &mut InfiniteList<String, String>,
) -> anyhow::Result<()> {
    let mut viewport = Viewport::new(body_height(terminal.size().height));
    let mut lines = visible_lines(list);
    let mut content_changed = true;
    let mut redraw = true;

    loop {
        if terminal.poll(Duration::from_millis(50))? {
            let moved = match terminal.read_event()? {
                Some(TerminalEvent::Key(HostKey::Quit)) => break,
                Some(TerminalEvent::Key(HostKey::Reset)) => {
                    log::info!("reset requested");
                    list.reset();
                    viewport.home();
                    content_changed = true;
                    true
                }
                Some(TerminalEvent::Key(key)) => {
                    let total = lines.len();
                    match key {
                        HostKey::Up => viewport.scroll_by(-1, total),
                        HostKey::Down => viewport.scroll_by(1, total),
                        HostKey::PageUp => viewport.page_up(total),
                        HostKey::PageDown => viewport.page_down(total),
                        HostKey::Home => viewport.home(),
                        HostKey::End => viewport.end(total),
                        _ => false,
                    }
                }
                Some(TerminalEvent::Resize { height, .. }) => {
                    viewport.set_height(body_height(height), lines.len());
                    true
                }
                None => false,
            };
            if moved {
                sync_host(host, &viewport, lines.len());
                redraw = true;
            }
        }

        if content_changed {
            lines = visible_lines(list);
            viewport.clamp(lines.len());
            sync_host(host, &viewport, lines.len());
            redraw = true;
        }

        content_changed = list.tick();
        if content_changed {
            lines = visible_lines(list);
        }
        if redraw || content_changed {
            draw(terminal, list, &viewport, &lines)?;
            redraw = false;
        }
    }
    Ok(())
}

/// Reports the viewport as the container's scroll position and notifies
/// subscribers.
fn sync_host(host: &ScrollHost, viewport: &Viewport, content_rows: usize) {
    host.set_client_height(viewport.height() as f64);
    host.set_content_height(content_rows as f64);
    host.scroll_to(viewport.offset() as f64);
    host.emit();
}

fn visible_lines(list: &InfiniteList<String, String>) -> Vec<String> {
    let frame = list.frame();
    let mut lines = frame.rows;
    lines.extend(frame.placeholder);
    lines
}

fn draw(
    terminal: &mut Terminal,
    list: &InfiniteList<String, String>,
    viewport: &Viewport,
    lines: &[String],
) -> anyhow::Result<()> {
    let status = match list.status() {
        ListStatus::Idle => "idle",
        ListStatus::Loading => "loading",
        ListStatus::Exhausted => "exhausted",
    };
    let header = format!(
        "steply-paged  {} items  page {}  {status}",
        list.state().len(),
        list.state().page_index()
    );
    let (start, end) = viewport.visible_range(lines.len());
    let footer = viewport.footer(lines.len()).unwrap_or_default();
    let footer = format!("{footer}  arrows/pgup/pgdn scroll  r reset  q quit");
    terminal.draw(&header, &lines[start..end], &footer)?;
    Ok(())
}
