// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESOLVEDOR DE REDIRECTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Segue URLs de redirecionamento até a URL final:
// - Um GET por URL, redirects seguidos automaticamente
// - Todas as URLs em paralelo (join_all), timeout por requisição
// - Qualquer falha mapeia a URL para ela mesma, sem abortar as outras
// - Sem retries e sem cancelamento
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use crate::types::{Url, UrlMapping};
use crate::utils::ActionTimer;

/// Timeout padrão por requisição, em segundos
pub const DEFAULT_TIMEOUT_SECS: f64 = 5.0;

/// Máximo de saltos de redirect seguidos por URL
pub const MAX_REDIRECTS: usize = 10;

/// Erros de resolução de uma URL
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait para resolvedores de URL
///
/// Recebe uma URL e devolve a URL onde a navegação termina.
#[async_trait]
pub trait UrlResolver: Send + Sync {
    /// Resolve uma única URL
    async fn resolve(&self, url: &str) -> Result<Url, ResolveError>;
}

/// Resolve todas as URLs em paralelo e devolve o mapa original → final.
///
/// Duplicatas são resolvidas independentemente. URLs que falham mapeiam para
/// si mesmas. Entrada vazia não faz nenhuma requisição.
pub async fn resolve_redirects<R>(resolver: &R, urls: &[Url]) -> UrlMapping
where
    R: UrlResolver + ?Sized,
{
    if urls.is_empty() {
        return UrlMapping::new();
    }

    let timer = ActionTimer::start(format!("Resolução de {} URLs", urls.len()));

    let futures: Vec<_> = urls
        .iter()
        .map(|url| async move {
            match resolver.resolve(url).await {
                Ok(resolved) => {
                    log::debug!("🔗 {} → {}", url, resolved);
                    (url.clone(), resolved)
                }
                Err(e) => {
                    log::warn!("⚠️ Falha ao resolver {}: {}", url, e);
                    (url.clone(), url.clone())
                }
            }
        })
        .collect();

    let results = join_all(futures).await;

    let changed = results.iter().filter(|(from, to)| from != to).count();
    let mapping: UrlMapping = results.into_iter().collect();

    timer.finish(&format!("{} redirecionadas", changed));
    mapping
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO HTTP
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolvedor que segue redirects com GET via reqwest
#[derive(Debug, Clone)]
pub struct HttpRedirectResolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpRedirectResolver {
    /// Cria um resolvedor com timeout por requisição
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .unwrap_or_default();

        Self { client, timeout }
    }

    /// Usa um cliente já configurado; `timeout` deve ser o mesmo do cliente
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Cria a partir de segundos fracionários.
    ///
    /// Valores não positivos ou não finitos caem para o padrão.
    pub fn from_secs(timeout_secs: f64) -> Self {
        let timeout = Duration::try_from_secs_f64(timeout_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| {
                log::warn!(
                    "⚠️ Timeout inválido {}, usando {}s",
                    timeout_secs,
                    DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS)
            });

        Self::new(timeout)
    }

    /// Timeout por requisição
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> ResolveError {
        if error.is_timeout() {
            ResolveError::Timeout(self.timeout)
        } else if error.is_redirect() {
            ResolveError::TooManyRedirects(url.to_string())
        } else {
            ResolveError::NetworkError(error.to_string())
        }
    }
}

impl Default for HttpRedirectResolver {
    fn default() -> Self {
        Self::from_secs(DEFAULT_TIMEOUT_SECS)
    }
}

#[async_trait]
impl UrlResolver for HttpRedirectResolver {
    async fn resolve(&self, url: &str) -> Result<Url, ResolveError> {
        let parsed =
            url::Url::parse(url).map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        if !response.status().is_success() {
            log::debug!("🔗 {} terminou com status {}", response.url(), response.status());
        }

        Ok(response.url().to_string())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolvedor mock: redirects fixos, falhas simuladas e contagem de chamadas
#[derive(Debug, Default)]
pub struct MockUrlResolver {
    pub redirects: HashMap<Url, Url>,
    pub failures: HashSet<Url>,
    calls: AtomicUsize,
}

impl MockUrlResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra um redirect `from` → `to`
    pub fn with_redirect(mut self, from: impl Into<Url>, to: impl Into<Url>) -> Self {
        self.redirects.insert(from.into(), to.into());
        self
    }

    /// Faz a resolução de `url` falhar
    pub fn with_failure(mut self, url: impl Into<Url>) -> Self {
        self.failures.insert(url.into());
        self
    }

    /// Número de chamadas a `resolve`
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UrlResolver for MockUrlResolver {
    async fn resolve(&self, url: &str) -> Result<Url, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failures.contains(url) {
            return Err(ResolveError::NetworkError(format!("mock failure for {}", url)));
        }

        Ok(self
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string()))
    }
}
