// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GROUNDING CITATIONS CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Lê uma resposta do modelo (JSON) e imprime a resposta anotada.
//
// Uso:
//   grounding-citations-cli resposta.json
//   cat resposta.json | grounding-citations-cli --no-resolve
//   grounding-citations-cli --timeout 2.5 --refs-json resposta.json
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use grounding_citations::config::parse_timeout;
use grounding_citations::{
    create_tokio_runtime, load_grounding_config, load_runtime_config, GroundingPipeline,
};

/// Opções da linha de comando (sobrescrevem o .env)
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    no_resolve: bool,
    timeout_secs: Option<f64>,
    refs_json: bool,
    input: Option<PathBuf>,
}

impl CliOptions {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Self::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--no-resolve" => options.no_resolve = true,
                "--refs-json" => options.refs_json = true,
                "--timeout" => {
                    let value = iter.next().ok_or("--timeout requer um valor")?;
                    let secs = parse_timeout(value)
                        .ok_or_else(|| format!("timeout inválido: '{}'", value))?;
                    options.timeout_secs = Some(secs);
                }
                flag if flag.starts_with("--") => {
                    return Err(format!("opção desconhecida: {}", flag));
                }
                path => {
                    if options.input.is_some() {
                        return Err("apenas um arquivo de entrada é aceito".into());
                    }
                    options.input = Some(PathBuf::from(path));
                }
            }
        }

        Ok(options)
    }
}

fn print_usage(program: &str) {
    eprintln!("Grounding Citations CLI v{}", grounding_citations::VERSION);
    eprintln!();
    eprintln!("Uso: {} [opções] [resposta.json]", program);
    eprintln!();
    eprintln!("Sem arquivo, lê o JSON da resposta do stdin.");
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --no-resolve       Não resolve URLs de redirecionamento");
    eprintln!("  --timeout <secs>   Timeout por requisição (padrão: 5.0)");
    eprintln!("  --refs-json        Imprime também os metadados {{\"refs\": [...]}}");
}

/// Carrega .env se existir (antes do logger, RUST_LOG pode estar nele)
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("⚠ Erro ao carregar .env: {}", e),
    }
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("falha ao ler {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("falha ao ler stdin")?;
            Ok(raw)
        }
    }
}

fn main() -> anyhow::Result<()> {
    load_dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("grounding-citations-cli");

    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        print_usage(program);
        return Ok(());
    }

    let options = match CliOptions::parse(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("✗ {}", msg);
            eprintln!();
            print_usage(program);
            std::process::exit(1);
        }
    };

    let mut config = load_grounding_config();
    if options.no_resolve {
        config = config.without_resolution();
    }
    if let Some(secs) = options.timeout_secs {
        config = config.with_timeout(secs);
    }

    let raw = read_input(options.input.as_ref())?;

    let runtime = create_tokio_runtime(&load_runtime_config())?;
    let output = runtime.block_on(async {
        let pipeline = GroundingPipeline::new(config);
        pipeline.render_json(&raw).await
    });

    println!("{}", output.text);

    if options.refs_json {
        println!();
        println!("{}", serde_json::to_string_pretty(&output.metadata)?);
    }

    Ok(())
}
