// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO RUNTIME E DO GROUNDING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configurações para o runtime Tokio e para a resolução de URLs.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::resolver::DEFAULT_TIMEOUT_SECS;

/// Configuração da anotação de citações.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundingConfig {
    /// Resolver URLs de redirecionamento antes de exibir.
    /// Desligado: referências mostram a URI bruta (ainda decodificada).
    pub resolve_urls: bool,

    /// Timeout por requisição de resolução, em segundos.
    /// Padrão: 5.0
    pub timeout_secs: f64,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            resolve_urls: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GroundingConfig {
    /// Desliga a resolução de URLs
    pub fn without_resolution(mut self) -> Self {
        self.resolve_urls = false;
        self
    }

    /// Define o timeout por requisição
    pub fn with_timeout(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Interpreta um booleano do .env.
///
/// Case-insensitive: "true/1/yes/on" e "false/0/no/off". Outros valores → None.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Interpreta um timeout em segundos (float positivo e finito)
pub fn parse_timeout(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0)
}

/// Carrega a configuração de grounding a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `GROUNDING_RESOLVE_URLS`: resolver redirects (padrão: true)
/// - `GROUNDING_RESOLVE_TIMEOUT`: timeout por requisição em segundos (padrão: 5.0)
///
/// Valores inválidos são ignorados com warning.
pub fn load_grounding_config() -> GroundingConfig {
    let mut config = GroundingConfig::default();

    if let Ok(value) = std::env::var("GROUNDING_RESOLVE_URLS") {
        match parse_bool(&value) {
            Some(resolve) => {
                config.resolve_urls = resolve;
                log::info!("📦 GROUNDING_RESOLVE_URLS={}", resolve);
            }
            None => log::warn!("⚠️ GROUNDING_RESOLVE_URLS inválido: '{}'", value),
        }
    }

    if let Ok(value) = std::env::var("GROUNDING_RESOLVE_TIMEOUT") {
        match parse_timeout(&value) {
            Some(secs) => {
                config.timeout_secs = secs;
                log::info!("📦 GROUNDING_RESOLVE_TIMEOUT={}s", secs);
            }
            None => log::warn!("⚠️ GROUNDING_RESOLVE_TIMEOUT inválido: '{}'", value),
        }
    }

    config
}

/// Configuração do runtime Tokio.
///
/// Controla número de threads e comportamento do async runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Número de worker threads do Tokio.
    /// Se None, usa cálculo dinâmico: min(cpu_cores, max_threads).
    pub worker_threads: Option<usize>,

    /// Número máximo de threads (limite superior para cálculo dinâmico).
    /// Padrão: 16
    pub max_threads: usize,

    /// Nome das threads do runtime.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_threads: 16,
            thread_name: "grounding-citations".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Calcula número efetivo de worker threads.
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| std::cmp::min(num_cpus::get(), self.max_threads))
    }
}

/// Carrega configuração do runtime a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `TOKIO_THREADS`: Número fixo de threads (opcional)
/// - `TOKIO_MAX_THREADS`: Máximo de threads para cálculo dinâmico (padrão: 16)
pub fn load_runtime_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();

    if let Some(threads) = env_usize("TOKIO_THREADS") {
        config.worker_threads = Some(threads);
        log::info!("📦 TOKIO_THREADS={} (fixo)", threads);
    }

    if let Some(max) = env_usize("TOKIO_MAX_THREADS") {
        config.max_threads = max;
        log::info!("📦 TOKIO_MAX_THREADS={}", max);
    }

    config
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

/// Cria o runtime Tokio com configuração customizada.
pub fn create_tokio_runtime(config: &RuntimeConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let worker_threads = config.effective_worker_threads();

    log::debug!("🚀 Criando runtime Tokio: {} workers", worker_threads);

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .thread_name(&config.thread_name)
        .enable_all()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounding_config_default() {
        let config = GroundingConfig::default();
        assert!(config.resolve_urls);
        assert!((config.timeout_secs - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grounding_config_builder() {
        let config = GroundingConfig::default()
            .without_resolution()
            .with_timeout(1.5);
        assert!(!config.resolve_urls);
        assert!((config.timeout_secs - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("Off"), Some(false));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("2.5"), Some(2.5));
        assert_eq!(parse_timeout(" 10 "), Some(10.0));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("-3"), None);
        assert_eq!(parse_timeout("inf"), None);
        assert_eq!(parse_timeout("abc"), None);
    }

    #[test]
    fn test_effective_worker_threads() {
        let mut config = RuntimeConfig::default();
        assert_eq!(
            config.effective_worker_threads(),
            std::cmp::min(num_cpus::get(), 16)
        );

        config.worker_threads = Some(2);
        assert_eq!(config.effective_worker_threads(), 2);
    }
}
