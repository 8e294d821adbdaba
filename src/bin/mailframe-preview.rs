use mailframe::{
    check_registry, extract_template_structure, is_template_html, render_email, render_template,
    try_parse_structure, validate_structure, EmailStructure, HeaderFooterKind,
    HeaderFooterLibrary, MailframeError, MailframeResult, RenderOptions, Severity,
    TemplateRecord,
};
use std::env;
use std::fs;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn usage() {
    eprintln!("Usage:");
    eprintln!("  mailframe-preview render <file> [--subject S] [--library L] [--header ID] [--footer ID] [--config C] [--out O]");
    eprintln!("  mailframe-preview validate <file>...");
    eprintln!();
    eprintln!("<file> is a structure JSON document or a template html body.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  mailframe-preview render welcome.json --library headers.json --header brand --out welcome.html");
    eprintln!("  mailframe-preview validate templates/*.json");
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailframe=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = check_registry() {
        eprintln!("✗ layout catalog is inconsistent:");
        print_error(&e);
        process::exit(1);
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
        process::exit(1);
    }

    let exit_code = match args[1].as_str() {
        "render" => match RenderArgs::parse(&args[2..]).and_then(|a| run_render(&a)) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("✗ render failed:");
                eprintln!("  {}", e);
                1
            }
        },
        "validate" => run_validate(&args[2..]),
        other => {
            eprintln!("Unknown command '{}'", other);
            usage();
            1
        }
    };

    process::exit(exit_code);
}

#[derive(Debug, Default)]
struct RenderArgs {
    file: String,
    subject: Option<String>,
    library: Option<String>,
    header: Option<String>,
    footer: Option<String>,
    config: Option<String>,
    out: Option<String>,
}

impl RenderArgs {
    fn parse(args: &[String]) -> MailframeResult<Self> {
        let mut parsed = RenderArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let slot = match arg.as_str() {
                "--subject" => &mut parsed.subject,
                "--library" => &mut parsed.library,
                "--header" => &mut parsed.header,
                "--footer" => &mut parsed.footer,
                "--config" => &mut parsed.config,
                "--out" => &mut parsed.out,
                flag if flag.starts_with("--") => {
                    return Err(MailframeError::ValidationError(format!(
                        "unknown option '{}'",
                        flag
                    )))
                }
                file => {
                    parsed.file = file.to_string();
                    continue;
                }
            };
            let value = iter.next().ok_or_else(|| {
                MailframeError::ValidationError(format!("option '{}' needs a value", arg))
            })?;
            *slot = Some(value.clone());
        }

        if parsed.file.is_empty() {
            return Err(MailframeError::ValidationError(
                "no input file given".to_string(),
            ));
        }
        Ok(parsed)
    }
}

fn read(path: &str) -> MailframeResult<String> {
    fs::read_to_string(path).map_err(|e| MailframeError::Io {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn run_render(args: &RenderArgs) -> MailframeResult<()> {
    let opts = match &args.config {
        Some(path) => RenderOptions::from_path(path)?,
        None => RenderOptions::default(),
    };
    let library = match &args.library {
        Some(path) => HeaderFooterLibrary::from_json(&read(path)?)?,
        None => HeaderFooterLibrary::default(),
    };
    let source = read(&args.file)?;

    let html = if is_template_html(&source) {
        let template = TemplateRecord {
            id: args.file.clone(),
            name: args.file.clone(),
            subject: args.subject.clone(),
            html: source,
            header_id: args.header.clone(),
            footer_id: args.footer.clone(),
        };
        render_template(&template, &library, &opts)
    } else {
        // A bare structure file has to parse; the lenient path is for stored records.
        let structure = try_parse_structure(&source)?;
        let header = args
            .header
            .as_deref()
            .and_then(|id| library.resolve(id, HeaderFooterKind::Header));
        let footer = args
            .footer
            .as_deref()
            .and_then(|id| library.resolve(id, HeaderFooterKind::Footer));
        render_email(
            Some(&structure),
            args.subject.as_deref(),
            header,
            footer,
            &opts,
        )
    };

    match &args.out {
        Some(path) => {
            fs::write(path, html).map_err(|e| MailframeError::Io {
                path: path.clone(),
                message: e.to_string(),
            })?;
            println!("✓ {} rendered to {}", args.file, path);
        }
        None => print!("{}", html),
    }
    Ok(())
}

fn load_structure(path: &str) -> MailframeResult<EmailStructure> {
    let source = read(path)?;
    if is_template_html(&source) {
        extract_template_structure(&source)
    } else {
        try_parse_structure(&source)
    }
}

fn run_validate(files: &[String]) -> i32 {
    let mut exit_code = 0;

    for file_path in files {
        match load_structure(file_path) {
            Ok(structure) => {
                let issues = validate_structure(&structure);
                let has_errors = issues.iter().any(|i| i.severity == Severity::Error);
                if has_errors {
                    eprintln!("✗ {} has errors:", file_path);
                    exit_code = 1;
                } else {
                    println!("✓ {} is valid", file_path);
                }
                for issue in &issues {
                    eprintln!("  {}", issue);
                }
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file_path);
                print_error(&e);
                exit_code = 1;
            }
        }
    }

    exit_code
}

fn print_error(error: &MailframeError) {
    match error {
        MailframeError::Json(msg) => {
            eprintln!("  JSON error:");
            eprintln!("    {}", msg);
        }
        MailframeError::MissingStructureMarker => {
            eprintln!("  Template html has no email structure");
            eprintln!("    Expected '<!-- Email Structure -->' followed by a JSON object");
        }
        MailframeError::SlotCountMismatch {
            layout_type,
            expected,
            actual,
        } => {
            eprintln!("  Layout '{}' does not match its row grouping:", layout_type);
            eprintln!("    rows hold {} slots, layout declares {}", expected, actual);
        }
        MailframeError::DuplicateSlotId {
            layout_type,
            slot_id,
        } => {
            eprintln!("  Layout '{}' declares slot '{}' twice", layout_type, slot_id);
        }
        MailframeError::Io { path, message } => {
            eprintln!("  Failed to read '{}':", path);
            eprintln!("    {}", message);
        }
        e => {
            eprintln!("  {}", e);
        }
    }
}
