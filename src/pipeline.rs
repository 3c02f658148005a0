// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PIPELINE DE GROUNDING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Compõe as etapas para uma resposta bruta do modelo:
// 1. Extrai texto e metadados de grounding (campo a campo)
// 2. Resolve URLs de redirecionamento (opcional, em paralelo)
// 3. Anota o texto com marcadores e referências
//
// Nunca falha: campos obrigatórios ausentes (candidato, texto, metadados de
// grounding) viram uma mensagem de diagnóstico no lugar da resposta.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;

use serde::Serialize;

use crate::config::GroundingConfig;
use crate::resolver::{resolve_redirects, HttpRedirectResolver, UrlResolver};
use crate::response::{ExtractError, GenerateContentResponse};
use crate::types::{RefsMetadata, UrlMapping};
use crate::utils::CitationBuilder;

/// Saída entregue à camada de ferramenta
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroundedOutput {
    /// Resposta anotada (ou diagnóstico)
    pub text: String,
    /// Referências estruturadas
    pub metadata: RefsMetadata,
}

/// Mensagem exibida no lugar da resposta quando a extração falha
pub fn diagnostic_message(error: &ExtractError) -> String {
    format!("Failed to process the grounded response: {}", error)
}

/// Pipeline de grounding
pub struct GroundingPipeline {
    config: GroundingConfig,
    resolver: Arc<dyn UrlResolver>,
}

impl GroundingPipeline {
    /// Cria com o resolvedor HTTP padrão
    pub fn new(config: GroundingConfig) -> Self {
        let resolver = Arc::new(HttpRedirectResolver::from_secs(config.timeout_secs));
        Self { config, resolver }
    }

    /// Cria com um resolvedor customizado
    pub fn with_resolver(config: GroundingConfig, resolver: Arc<dyn UrlResolver>) -> Self {
        Self { config, resolver }
    }

    /// Configuração em uso
    pub fn config(&self) -> &GroundingConfig {
        &self.config
    }

    /// Processa o JSON bruto da resposta
    pub async fn render_json(&self, raw: &str) -> GroundedOutput {
        match GenerateContentResponse::from_json(raw) {
            Ok(response) => self.render(&response).await,
            Err(e) => {
                log::warn!("⚠️ Resposta inválida: {}", e);
                GroundedOutput {
                    text: diagnostic_message(&e),
                    metadata: RefsMetadata::default(),
                }
            }
        }
    }

    /// Processa uma resposta já desserializada
    pub async fn render(&self, response: &GenerateContentResponse) -> GroundedOutput {
        let text = match response.text() {
            Ok(text) => text,
            Err(e) => {
                log::warn!("⚠️ Resposta sem texto: {}", e);
                return GroundedOutput {
                    text: diagnostic_message(&e),
                    metadata: RefsMetadata::default(),
                };
            }
        };

        let metadata = match response.grounding_metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("⚠️ Resposta sem grounding: {}", e);
                return GroundedOutput {
                    text: diagnostic_message(&e),
                    metadata: RefsMetadata::default(),
                };
            }
        };

        let chunks = metadata.source_chunks();
        let segments = metadata.segments();

        let url_mapping = if self.config.resolve_urls && !chunks.is_empty() && !segments.is_empty()
        {
            resolve_redirects(self.resolver.as_ref(), &metadata.citable_uris()).await
        } else {
            UrlMapping::new()
        };

        let annotated = CitationBuilder::new()
            .with_url_mapping(&url_mapping)
            .annotate(&text, &chunks, &segments);

        GroundedOutput {
            text: annotated,
            metadata: metadata.refs(),
        }
    }
}
