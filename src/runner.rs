use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{Cli, Commands};
use posture_hunter::analyze::{ResponseHeaders, SecurityAnalyzer};
use posture_hunter::concurrent::ConcurrentScan;
use posture_hunter::config::{AnalyzerConfig, ScanConfig};
use posture_hunter::http_client::{create_client, DEFAULT_USER_AGENT};
use posture_hunter::output::{
    cleanup_results, render_result, spawn_jsonl_writer, write_csv, write_top_txt, ScanRecord, ScanReport,
};
use posture_hunter::output::results_manager::OUTPUT_FILES;
use posture_hunter::probe::fetch_page;

fn print_ascii_logo() {
    println!(r#"
     ____            _                    _   _             _
    |  _ \ ___  ___| |_ _   _ _ __ ___  | | | |_   _ _ __ | |_ ___ _ __
    | |_) / _ \/ __| __| | | | '__/ _ \ | |_| | | | | '_ \| __/ _ \ '__|
    |  __/ (_) \__ \ |_| |_| | | |  __/ |  _  | |_| | | | | ||  __/ |
    |_|   \___/|___/\__|\__,_|_|  \___| |_| |_|\__,_|_| |_|\__\___|_|

                     HTTP Security Posture v0.1.0
    "#);
}

pub async fn run_from_cli(cli: Cli) -> anyhow::Result<()> {
    // Our crate at the requested level, external crates held at INFO.
    use tracing_subscriber::EnvFilter;
    let crate_level = if cli.debug { "debug" } else if cli.verbose { "info" } else { "warn" };
    let filter_str = format!(
        "posture_hunter={crate},reqwest=info,hyper=info,h2=info",
        crate = crate_level
    );
    let env_filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new(crate_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(true)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan { target, out, concurrency, timeout, retries, user_agent, config, report } => {
            let analyzer_config = load_config(config.as_deref())?;
            let scan_config = ScanConfig {
                concurrency: concurrency.max(1),
                timeout_secs: timeout,
                retries: retries.min(10),
                user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            };

            tracing::info!(scan_target=%target, out=%out, concurrency=scan_config.concurrency, retries=scan_config.retries, timeout, "Starting scan");

            print_ascii_logo();
            println!("[>] Target: {}", target);
            println!("[~] Concurrency: {} | Timeout: {}s | Retries: {}", scan_config.concurrency, scan_config.timeout_secs, scan_config.retries);
            println!("\n{}\n", "-".repeat(60));

            run_scan(&target, &out, scan_config, analyzer_config, report).await?;
        }
        Commands::Inspect { url, body, headers, user_agent, config } => {
            let analyzer_config = load_config(config.as_deref())?;
            run_inspect(&url, &body, headers.as_deref(), user_agent.as_deref(), &analyzer_config)?;
        }
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> anyhow::Result<AnalyzerConfig> {
    match path {
        Some(p) => {
            let config = AnalyzerConfig::from_file(Path::new(p))?;
            tracing::debug!(path = p, ?config, "loaded analyzer config");
            Ok(config)
        }
        None => Ok(AnalyzerConfig::default()),
    }
}

async fn run_scan(
    target: &str,
    out: &str,
    scan_config: ScanConfig,
    analyzer_config: AnalyzerConfig,
    report_path: Option<String>,
) -> anyhow::Result<()> {
    let out_dir = PathBuf::from(out);
    posture_hunter::utils::ensure_dir(&out_dir)?;
    let removed = cleanup_results(&out_dir)?;
    if removed > 0 {
        println!("[*] Cleaned {} previous result file(s)", removed);
    }

    let scan_start = Instant::now();
    let targets = posture_hunter::utils::read_targets(target)?;
    let total = targets.len();

    let analyzer = Arc::new(SecurityAnalyzer::new(&analyzer_config)?);
    let client = create_client(scan_config.timeout_secs, &scan_config.user_agent)?;

    let jsonl_path = out_dir.join(OUTPUT_FILES[0]);
    let (tx_jsonl, rx_jsonl) = tokio::sync::mpsc::channel::<ScanRecord>(1024);
    let jh_jsonl = spawn_jsonl_writer(jsonl_path, rx_jsonl);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );

    let pool = ConcurrentScan::new(scan_config.concurrency as usize);
    let task = {
        let client = client.clone();
        let analyzer = analyzer.clone();
        let tx = tx_jsonl.clone();
        let pb = pb.clone();
        let user_agent = scan_config.user_agent.clone();
        let retries = scan_config.retries as usize;
        let max_body = analyzer_config.max_body_bytes;
        move |target: String| {
            let client = client.clone();
            let analyzer = analyzer.clone();
            let tx = tx.clone();
            let pb = pb.clone();
            let user_agent = user_agent.clone();
            async move {
                let outcome = async {
                    let page = fetch_page(&client, &target, max_body, retries, 200, 5000).await?;
                    let security_metrics =
                        analyzer.analyze(&page.final_url, &page.headers, &page.body, &user_agent)?;
                    Ok::<ScanRecord, anyhow::Error>(ScanRecord {
                        target: target.clone(),
                        final_url: page.final_url,
                        status: page.status,
                        response_ms: page.response_ms,
                        body_truncated: page.truncated,
                        security_metrics,
                    })
                }
                .await;

                match &outcome {
                    Ok(record) => {
                        tracing::info!(scan_target=%target, status=record.status, score=record.security_metrics.overall_score, "analyzed");
                        if tx.send(record.clone()).await.is_err() {
                            tracing::warn!("jsonl writer closed early");
                        }
                    }
                    Err(e) => tracing::debug!(scan_target=%target, error=%e, "scan failed"),
                }
                pb.set_message(target.clone());
                pb.inc(1);
                (target, outcome)
            }
        }
    };

    tracing::info!("Starting fetch phase: {} targets with concurrency {}", total, scan_config.concurrency);
    let results = pool.execute(targets, task).await;
    pb.finish_and_clear();

    tracing::debug!("Flushing output writers...");
    drop(tx_jsonl);
    if tokio::time::timeout(Duration::from_secs(5), jh_jsonl).await.is_err() {
        tracing::warn!("Output writer did not finish within 5s");
    }

    let mut records: Vec<ScanRecord> = Vec::new();
    let mut report = ScanReport::new();
    for (target, outcome) in results.into_iter().flatten() {
        match outcome {
            Ok(record) => records.push(record),
            Err(e) => report.add_failure(&target, &e),
        }
    }
    records.sort_by(|a, b| a.target.cmp(&b.target));
    for r in &records {
        report.add_record(r);
    }

    let (completed, panicked) = pool.get_stats();
    tracing::info!(completed, panicked, analyzed = records.len(), "scan finished");

    let refs: Vec<&ScanRecord> = records.iter().collect();
    write_csv(&out_dir.join(OUTPUT_FILES[1]), &refs)?;
    write_top_txt(&out_dir.join(OUTPUT_FILES[2]), &refs)?;

    report.scan_duration_seconds = scan_start.elapsed().as_secs();
    report.print_summary(&out_dir.display().to_string());

    if let Some(path) = report_path {
        report.save_to_file(Path::new(&path))?;
        println!("[+] Report saved to: {}", path);
    }

    Ok(())
}

fn run_inspect(
    url: &str,
    body_path: &str,
    headers_path: Option<&str>,
    user_agent: Option<&str>,
    config: &AnalyzerConfig,
) -> anyhow::Result<()> {
    let mut body = std::fs::read(body_path)?;
    if body.len() > config.max_body_bytes {
        tracing::warn!(len = body.len(), limit = config.max_body_bytes, "body truncated to limit");
        body.truncate(config.max_body_bytes);
    }
    let headers = match headers_path {
        Some(p) => ResponseHeaders::parse_raw(&std::fs::read_to_string(p)?),
        None => ResponseHeaders::new(),
    };
    tracing::debug!(url, headers = headers.len(), body_len = body.len(), "inspecting saved response");

    let analyzer = SecurityAnalyzer::new(config)?;
    let result = analyzer.analyze(url, &headers, &body, user_agent.unwrap_or(DEFAULT_USER_AGENT))?;
    println!("{}", render_result(&result)?);
    Ok(())
}
