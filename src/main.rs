use std::fs;
use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;

use heylingo::core::{
    collect_payloads, format_output_path, localize_document, print_error_message,
    print_info_message, read_input, render_payloads, LocalizeOptions,
};
use heylingo::env::{core::NoColor, EnvVar};
use heylingo::translation::{
    ConfigManager, HttpRemoteClient, LocalizerConfig, MemoryPreferenceStore, PageLocalizer,
    PreferenceStore, RedbPreferenceStore, TranslationResult,
};

#[derive(Parser, Debug)]
#[command(
    name = "heylingo",
    version,
    about = "Localize a saved HTML page through the heylingo translation service"
)]
struct Cli {
    /// HTML file to localize ("-" or omitted reads stdin)
    input: Option<String>,

    /// Address the page was served from (decides domain and page path)
    #[arg(short = 'u', long)]
    url: String,

    /// Browser locale used when no language has been selected yet
    #[arg(short = 'l', long)]
    locale: Option<String>,

    /// Select this language before localizing, as the switcher would
    #[arg(short = 's', long)]
    language: Option<String>,

    /// Input charset (detected from <meta charset> when omitted)
    #[arg(short = 'e', long)]
    encoding: Option<String>,

    /// Write the result here instead of stdout (%title% and %lang% are expanded)
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Translation service base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Preference database path
    #[arg(long)]
    preferences: Option<String>,

    /// Keep language preferences in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Deadline for each remote call, in seconds
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,

    /// Print the extracted segments as JSON without contacting the service
    #[arg(long)]
    dry_run: bool,

    /// Suppress the summary
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> LocalizeOptions {
        LocalizeOptions {
            page_url: self.url.clone(),
            browser_locale: self.locale.clone(),
            language: self.language.clone(),
            input_encoding: self.encoding.clone(),
            silent: self.quiet,
        }
    }

    fn load_config(&self) -> TranslationResult<(LocalizerConfig, Option<String>)> {
        let manager = match &self.config {
            Some(path) => ConfigManager::from_file(path)?,
            None => ConfigManager::new()?,
        };
        let source = manager.source().map(str::to_string);
        let mut config = manager.into_config();

        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(path) = &self.preferences {
            config.preferences_path = path.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        config.validate()?;
        Ok((config, source))
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(!NoColor::get_or_default(false))
        .init();
}

fn write_output(cli: &Cli, data: &[u8], title: Option<&str>, language: Option<&str>) -> io::Result<()> {
    match cli.output.as_deref() {
        None | Some("-") => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()
        }
        Some(path) => fs::write(format_output_path(path, title, language), data),
    }
}

async fn run(cli: &Cli) -> TranslationResult<()> {
    let (config, source) = cli.load_config()?;
    init_logging(&config.log_level);
    match source {
        Some(path) => tracing::info!("加载配置文件: {}", path),
        None => tracing::debug!("未找到配置文件，使用默认配置"),
    }

    let options = cli.options();
    let data = read_input(cli.input.as_deref())?;

    if cli.dry_run {
        let payloads = collect_payloads(&data, &options)?;
        println!("{}", render_payloads(&payloads)?);
        return Ok(());
    }

    let store: Arc<dyn PreferenceStore> = if cli.ephemeral {
        Arc::new(MemoryPreferenceStore::new())
    } else {
        Arc::new(RedbPreferenceStore::open(config.preferences_path())?)
    };
    let remote = HttpRemoteClient::new(&config.api_base)?;
    let mut localizer = PageLocalizer::new(config, remote, store);

    let (result, title, report) = localize_document(&mut localizer, &data, &options).await?;
    write_output(
        cli,
        &result,
        title.as_deref(),
        report.selected_language.as_deref(),
    )?;

    if !options.silent {
        print_info_message(&format!(
            "language: {} (original: {}), segments: {} extracted, {} translated",
            report.selected_language.as_deref().unwrap_or("-"),
            report.original_language.as_deref().unwrap_or("-"),
            report.segments_extracted,
            report.segments_translated,
        ));
        if let Some(reason) = report.translation_skipped {
            print_info_message(&format!("translation skipped: {}", reason));
        }
        for error in [&report.catalog_error, &report.translation_error].into_iter().flatten() {
            print_error_message(&error.to_string());
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        print_error_message(&format!("Error: {}", e));
        process::exit(1);
    }
}
