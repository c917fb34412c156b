use std::env;

use indicatif::{ProgressBar, ProgressStyle};

use ragkit_core::config::{expand_path, Config};
use ragkit_core::source::{list_txt_files, read_text_lossy};
use ragkit_core::types::Document;
use ragkit_gen::backend::GeminiBackend;
use ragkit_gen::generator::Generator;
use ragkit_pipeline::{PipelineConfig, RagSession};

const NO_CONTEXT_MESSAGE: &str = "I couldn't find relevant information in your documents to \
answer that question. Try rephrasing or asking about something more specific.";

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ask|context> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn expect_arg(args: &[String], index: usize, usage: &str) -> String {
    args.get(index).cloned().unwrap_or_else(|| {
        eprintln!("Usage: ragkit {usage}");
        std::process::exit(1)
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ask" => {
            let question = expect_arg(&args, 0, "ask \"<question>\" [data_dir]");
            let session = build_session(&config, args.get(1))?;
            let Some(backend) = GeminiBackend::from_env() else {
                eprintln!("GEMINI_API_KEY is not set; use `context` for offline retrieval.");
                std::process::exit(1);
            };
            let generator = Generator::new(Box::new(backend));
            match session.ask(&question, &generator)? {
                Some(answer) => println!("{answer}"),
                None => println!("{NO_CONTEXT_MESSAGE}"),
            }
        }
        "context" => {
            let question = expect_arg(&args, 0, "context \"<question>\" [data_dir]");
            let session = build_session(&config, args.get(1))?;
            let context = session.context_for(&question);
            if context.is_empty() {
                println!("{NO_CONTEXT_MESSAGE}");
            } else {
                println!("{context}");
            }
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn build_session(config: &Config, dir_arg: Option<&String>) -> anyhow::Result<RagSession> {
    let data_dir = dir_arg.map(expand_path).unwrap_or_else(|| {
        let dir: String = config
            .get("data.docs_dir")
            .unwrap_or_else(|_| "documents".to_string());
        expand_path(dir)
    });
    let files = list_txt_files(&data_dir);
    if files.is_empty() {
        anyhow::bail!("no .txt documents found under {}", data_dir.display());
    }

    println!("Loading {} document(s) from {}", files.len(), data_dir.display());
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?
            .progress_chars("#>-"),
    );
    let mut documents = Vec::new();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        pb.set_message(name.clone());
        match read_text_lossy(&path) {
            Ok(text) => documents.push(Document::new(name, text)),
            Err(e) => eprintln!("Skipping {}: {}", path.display(), e),
        }
        pb.inc(1);
    }
    pb.finish_with_message("loaded");

    let mut session = RagSession::new(pipeline_config(config));
    let chunk_count = session.ingest(&documents)?;
    println!("✅ Indexed {} chunks from {} document(s)", chunk_count, session.sources().len());
    Ok(session)
}

fn pipeline_config(config: &Config) -> PipelineConfig {
    let mut cfg = PipelineConfig::default();
    if let Ok(size) = config.get::<usize>("pipeline.chunk_size") {
        cfg.chunker.chunk_size = size;
    }
    if let Ok(overlap) = config.get::<usize>("pipeline.chunk_overlap") {
        cfg.chunker.chunk_overlap = overlap;
    }
    if let Ok(min_len) = config.get::<usize>("pipeline.min_chunk_len") {
        cfg.chunker.min_chunk_len = min_len;
    }
    if let Ok(k) = config.get::<usize>("pipeline.retrieve_k") {
        cfg.retrieve_k = k;
    }
    cfg
}
