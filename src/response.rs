// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RESPOSTA DE GERAÇÃO COM GROUNDING
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Tipos de fio (JSON camelCase) da resposta do modelo com busca web e a
// extração campo a campo para o modelo de dados do anotador:
// - candidates[0].content.parts[*].text → texto da resposta
// - groundingMetadata.groundingChunks[*].web → SourceChunk
// - groundingMetadata.groundingSupports[*] → Segment
//
// Todos os campos são opcionais no fio. Campos obrigatórios para produzir
// uma resposta viram ExtractError; os demais caem para um default.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Ref, RefsMetadata, Segment, SourceChunk, Url};

/// Erros de extração dos campos da resposta
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid response JSON: {0}")]
    InvalidJson(String),

    #[error("response has no candidates")]
    NoCandidates,

    #[error("candidate has no content")]
    NoContent,

    #[error("candidate content has no text part")]
    NoTextPart,

    #[error("candidate has no grounding metadata")]
    NoGroundingMetadata,
}

/// Resposta completa do endpoint de geração
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Partes de raciocínio não fazem parte da resposta visível
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_queries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_supports: Option<Vec<GroundingSupport>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingSupport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<TextSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_chunk_indices: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_scores: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Faz o parse do JSON bruto da resposta
    pub fn from_json(raw: &str) -> Result<Self, ExtractError> {
        serde_json::from_str(raw).map_err(|e| ExtractError::InvalidJson(e.to_string()))
    }

    /// Primeiro candidato (o único usado)
    pub fn first_candidate(&self) -> Result<&Candidate, ExtractError> {
        self.candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or(ExtractError::NoCandidates)
    }

    /// Texto visível da resposta: concatenação das partes de texto
    pub fn text(&self) -> Result<String, ExtractError> {
        let content = self
            .first_candidate()?
            .content
            .as_ref()
            .ok_or(ExtractError::NoContent)?;

        let texts: Vec<&str> = content
            .parts
            .iter()
            .flatten()
            .filter(|p| !p.thought.unwrap_or(false))
            .filter_map(|p| p.text.as_deref())
            .collect();

        if texts.is_empty() {
            return Err(ExtractError::NoTextPart);
        }

        Ok(texts.concat())
    }

    /// Metadados de grounding do primeiro candidato
    pub fn grounding_metadata(&self) -> Result<&GroundingMetadata, ExtractError> {
        self.first_candidate()?
            .grounding_metadata
            .as_ref()
            .ok_or(ExtractError::NoGroundingMetadata)
    }
}

impl GroundingMetadata {
    /// Converte os grounding chunks em SourceChunk preservando as posições.
    ///
    /// Chunks sem descritor web viram um SourceChunk vazio para que os
    /// índices dos supports continuem apontando para o chunk certo.
    pub fn source_chunks(&self) -> Vec<SourceChunk> {
        self.grounding_chunks
            .iter()
            .flatten()
            .map(|chunk| match &chunk.web {
                Some(web) => SourceChunk {
                    uri: web.uri.clone(),
                    title: web.title.clone(),
                },
                None => SourceChunk::default(),
            })
            .collect()
    }

    /// Converte os grounding supports em Segment.
    ///
    /// Supports sem segmento ou com `endIndex` ausente/negativo são descartados;
    /// índices de chunk negativos são ignorados.
    pub fn segments(&self) -> Vec<Segment> {
        self.grounding_supports
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, support)| {
                let end_index = support.segment.as_ref().and_then(|s| s.end_index);
                let end_index = match end_index.map(usize::try_from) {
                    Some(Ok(end)) => end,
                    _ => {
                        log::debug!("[segments] Support {} sem endIndex válido: {:?}", i, end_index);
                        return None;
                    }
                };

                let chunk_indices = support
                    .grounding_chunk_indices
                    .iter()
                    .flatten()
                    .filter_map(|&idx| usize::try_from(idx).ok())
                    .collect();

                Some(Segment::new(end_index, chunk_indices))
            })
            .collect()
    }

    /// URIs citáveis únicas, na ordem do primeiro encontro
    pub fn citable_uris(&self) -> Vec<Url> {
        let mut seen = HashSet::new();
        self.source_chunks()
            .iter()
            .filter_map(|c| c.citable_uri())
            .filter(|uri| seen.insert(uri.to_string()))
            .map(String::from)
            .collect()
    }

    /// Lista `refs` com um item por chunk que tem URI e título
    pub fn refs(&self) -> RefsMetadata {
        let refs = self
            .grounding_chunks
            .iter()
            .flatten()
            .filter_map(|chunk| {
                let web = chunk.web.as_ref()?;
                Some(Ref {
                    link: web.uri.clone()?,
                    title: web.title.clone()?,
                    ..Default::default()
                })
            })
            .collect();

        RefsMetadata { refs }
    }
}
