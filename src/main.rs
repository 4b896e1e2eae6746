use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use weft::config;
use weft::layout::{FixedAdvance, FontStyle, PieceContent};
use weft::message::element::{ContentElement, ElementFlags, Link};
use weft::message::Message;

/// Development stand-in for a rendering layer: builds a message from the
/// command line, runs one layout pass, and prints where every piece
/// landed.
#[derive(Parser)]
#[command(name = "weft", about = "Chat message layout inspector")]
struct Args {
    /// Target line width in pixels
    #[arg(short, long, default_value_t = 400.0)]
    width: f32,

    /// Scale multiplier (overrides the configured value)
    #[arg(short, long)]
    scale: Option<f32>,

    /// Sender login name
    #[arg(long, default_value = "console")]
    login: String,

    /// Include the moderation toolbar in the pass
    #[arg(long)]
    moderation: bool,

    /// Emit the laid-out pieces as JSON
    #[arg(long)]
    json: bool,

    /// Message text to lay out
    #[arg(required = true)]
    text: Vec<String>,
}

fn main() {
    let args = Args::parse();

    // File logger — writes to weft.log in the current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("weft.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("weft layout inspector starting");

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {e}");
        config::WeftConfig::default()
    });
    let resolved = config::resolve(&file_config);

    let mut settings = resolved.settings;
    if !args.moderation {
        settings.moderation_actions.clear();
    }
    let scale = args.scale.unwrap_or(resolved.scale);

    let mut elements = vec![
        ContentElement::timestamp_now(),
        ContentElement::text(
            &format!("{}:", args.login),
            ElementFlags::USERNAME,
            FontStyle::MediumBold,
        )
        .with_link(Link::UserInfo(args.login.clone())),
        ContentElement::text(&args.text.join(" "), ElementFlags::TEXT, FontStyle::Medium),
    ];
    let mut flags = ElementFlags::DEFAULT;
    if args.moderation {
        elements.push(ContentElement::moderation());
        flags |= ElementFlags::MODERATOR_TOOLS;
    }

    let message = Message::new(args.login.clone(), args.login.clone(), elements);
    let metrics = FixedAdvance::default();
    let layout = message.layout(args.width, scale, &metrics, &settings, flags);

    log::info!(
        "laid out {} pieces on {} lines at width {} scale {}",
        layout.pieces.len(),
        layout.line_count(),
        args.width,
        scale
    );

    if args.json {
        print_json(&layout);
    } else {
        print_table(&layout);
    }
}

fn print_table(layout: &weft::layout::MessageLayout) {
    println!(
        "{} line(s), {} piece(s), total height {:.1}",
        layout.line_count(),
        layout.pieces.len(),
        layout.height
    );
    for line in 0..layout.line_count() {
        println!(
            "line {line}  top {:>6.1}  height {:>5.1}",
            layout.line_top(line),
            layout.line_heights[line]
        );
        for piece in layout.pieces_on_line(line) {
            let label = match &piece.content {
                PieceContent::Text { text, .. } => format!("{text:?}"),
                PieceContent::Image { image } => format!("[image {}]", image.name),
                PieceContent::TextIcon { line1, line2 } => format!("[icon {line1}/{line2}]"),
            };
            println!(
                "  x {:>6.1}  w {:>6.1}  h {:>5.1}  {label}",
                piece.rect.x, piece.rect.width, piece.rect.height
            );
        }
    }
}

fn print_json(layout: &weft::layout::MessageLayout) {
    let pieces: Vec<serde_json::Value> = layout
        .pieces
        .iter()
        .map(|piece| {
            let kind = match &piece.content {
                PieceContent::Text { .. } => "text",
                PieceContent::Image { .. } => "image",
                PieceContent::TextIcon { .. } => "icon",
            };
            serde_json::json!({
                "kind": kind,
                "text": piece.as_text(),
                "line": piece.line,
                "x": piece.rect.x,
                "y": piece.rect.y,
                "width": piece.rect.width,
                "height": piece.rect.height,
                "trailing_space": piece.trailing_space,
            })
        })
        .collect();

    let doc = serde_json::json!({
        "lines": layout.line_count(),
        "line_heights": layout.line_heights,
        "height": layout.height,
        "pieces": pieces,
    });
    println!("{}", serde_json::to_string_pretty(&doc).unwrap_or_default());
}
