//! # Grounding Citations
//!
//! Este crate anota respostas de um modelo de linguagem com busca web
//! (grounding) com marcadores de citação inline e uma lista numerada de
//! referências sem duplicatas, resolvendo opcionalmente as URLs de
//! redirecionamento das fontes até o destino final.
//!
//! ## Arquitetura
//!
//! Dois componentes independentes, compostos pelo [`GroundingPipeline`]:
//!
//! ### 1. Resolvedor de Redirects (`resolver`)
//! - Um GET por URL, seguindo redirects
//! - Todas as URLs em paralelo com timeout por requisição
//! - Falhas mapeiam a URL para ela mesma
//!
//! ### 2. Anotador de Citações (`utils::build_ref`)
//! - Numeração estável das fontes únicas (chave = URI bruta)
//! - Marcadores `[1,2]` inseridos por índice de caractere, do fim para o início
//! - Seção de referências com URLs resolvidas e decodificadas
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use grounding_citations::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = GroundingPipeline::new(load_grounding_config());
//!     let output = pipeline.render_json(&raw_response_json).await;
//!     println!("{}", output.text);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados.
///
/// - [`SourceChunk`]: Fonte candidata (URI + título)
/// - [`Segment`]: Trecho da resposta apoiado por chunks
/// - [`SourceMap`]: Numeração estável das fontes únicas
/// - [`UrlMapping`]: URL original → URL resolvida
/// - [`RefsMetadata`]: Referências estruturadas para a camada de ferramenta
pub mod types;

/// Resposta do modelo com grounding.
///
/// Tipos de fio (JSON camelCase) e extração campo a campo, com
/// [`ExtractError`](response::ExtractError) para os campos obrigatórios.
#[allow(missing_docs)]
pub mod response;

/// Resolução de URLs de redirecionamento.
///
/// Define a trait `UrlResolver` e implementações para:
/// - HTTP (reqwest, redirects seguidos automaticamente)
/// - Mock para testes
#[allow(missing_docs)]
pub mod resolver;

/// Pipeline completo: extração → resolução → anotação.
pub mod pipeline;

/// Utilitários diversos.
///
/// - Anotação de citações
/// - Inserção por índice de caractere e decodificação de URLs
/// - Timing
pub mod utils;

/// Configuração do runtime e do grounding.
///
/// **Grounding:**
/// - `GROUNDING_RESOLVE_URLS`: Resolver redirects (padrão: true)
/// - `GROUNDING_RESOLVE_TIMEOUT`: Timeout por requisição em segundos (padrão: 5.0)
///
/// **Runtime Tokio:**
/// - `TOKIO_THREADS`: Número de threads do runtime (padrão: dinâmico)
/// - `TOKIO_MAX_THREADS`: Máximo de threads (padrão: 16)
pub mod config;

// Re-exports principais
pub use config::{
    create_tokio_runtime, load_grounding_config, load_runtime_config, GroundingConfig,
    RuntimeConfig,
};
pub use pipeline::{GroundedOutput, GroundingPipeline};
pub use resolver::{resolve_redirects, HttpRedirectResolver, ResolveError, UrlResolver};
pub use response::{ExtractError, GenerateContentResponse};
pub use types::*;
pub use utils::{add_citations, CitationBuilder};

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// ```rust,ignore
/// use grounding_citations::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{load_grounding_config, GroundingConfig};
    pub use crate::pipeline::{GroundedOutput, GroundingPipeline};
    pub use crate::resolver::{
        resolve_redirects, HttpRedirectResolver, MockUrlResolver, UrlResolver,
    };
    pub use crate::response::GenerateContentResponse;
    pub use crate::types::*;
    pub use crate::utils::{add_citations, CitationBuilder};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
