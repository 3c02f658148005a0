// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Modelo de dados do anotador de citações e do resolvedor de redirects.
// Tudo é construído do zero a cada invocação e descartado depois.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Tipo de URL (alias para String)
pub type Url = String;

/// Mapa URL original → URL final após seguir redirects.
///
/// Best-effort: ausência de entrada (ou mapeamento identidade) significa que a
/// resolução falhou ou foi pulada, e a URL original deve ser exibida.
pub type UrlMapping = HashMap<Url, Url>;

/// Índice do chunk na sequência original → número da nota de rodapé
pub type ChunkFootnotes = HashMap<usize, usize>;

/// Título usado quando a fonte não traz título
pub const UNKNOWN_SOURCE_TITLE: &str = "Unknown source";

/// Fonte candidata de evidência (um grounding chunk com descritor web)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceChunk {
    /// URI da fonte (pode ser uma URL de redirecionamento)
    pub uri: Option<Url>,
    /// Título da página
    pub title: Option<String>,
}

impl SourceChunk {
    /// Cria um chunk com URI e título
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title: Some(title.into()),
        }
    }

    /// Cria um chunk sem título
    pub fn untitled(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            title: None,
        }
    }

    /// URI não vazia, se houver
    pub fn citable_uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|u| !u.is_empty())
    }

    /// Título para exibição
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_SOURCE_TITLE)
    }
}

/// Trecho contíguo da resposta apoiado por um ou mais chunks.
///
/// Só o offset final (exclusivo, em caracteres) importa para a inserção.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    /// Offset final exclusivo, em caracteres do texto original
    pub end_index: usize,
    /// Índices dos chunks que apoiam o trecho
    pub chunk_indices: Vec<usize>,
}

impl Segment {
    /// Cria um segmento
    pub fn new(end_index: usize, chunk_indices: Vec<usize>) -> Self {
        Self {
            end_index,
            chunk_indices,
        }
    }
}

/// Uma fonte única com seu número de nota
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Número da nota (1-based)
    pub number: usize,
    /// URI bruta (chave de deduplicação)
    pub uri: Url,
    /// Título para exibição
    pub title: String,
}

/// Numeração estável das fontes únicas.
///
/// Números densos a partir de 1, atribuídos na ordem do primeiro encontro.
/// Reencontrar uma URI nunca muda seu número.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    entries: Vec<SourceEntry>,
    by_uri: HashMap<Url, usize>,
    chunk_footnotes: ChunkFootnotes,
}

impl SourceMap {
    /// Numera as fontes percorrendo os chunks na ordem original
    pub fn from_chunks(chunks: &[SourceChunk]) -> Self {
        let mut map = Self::default();

        for (chunk_index, chunk) in chunks.iter().enumerate() {
            let Some(uri) = chunk.citable_uri() else {
                log::debug!("[SourceMap] Chunk {} sem URI, ignorado", chunk_index);
                continue;
            };

            let number = match map.by_uri.get(uri) {
                Some(&number) => number,
                None => {
                    let number = map.entries.len() + 1;
                    map.entries.push(SourceEntry {
                        number,
                        uri: uri.to_string(),
                        title: chunk.display_title().to_string(),
                    });
                    map.by_uri.insert(uri.to_string(), number);
                    number
                }
            };

            map.chunk_footnotes.insert(chunk_index, number);
        }

        map
    }

    /// Fontes ordenadas pelo número da nota
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    #[cfg(test)]
    fn number_for_uri(&self, uri: &str) -> Option<usize> {
        self.by_uri.get(uri).copied()
    }

    #[cfg(test)]
    fn chunk_footnotes(&self) -> &ChunkFootnotes {
        &self.chunk_footnotes
    }

    /// Notas distintas alcançáveis pelos chunks, em ordem crescente
    pub fn footnotes_for(&self, chunk_indices: &[usize]) -> Vec<usize> {
        let mut numbers: Vec<usize> = chunk_indices
            .iter()
            .filter_map(|i| self.chunk_footnotes.get(i).copied())
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// Número de fontes únicas
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Verifica se não há fontes citáveis
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Referência estruturada emitida junto com o texto
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ref {
    /// URL da fonte
    pub link: String,
    /// Título da página
    pub title: String,
    /// Trecho da página (vazio quando desconhecido)
    #[serde(default)]
    pub snippet: String,
    /// Data da página (vazia quando desconhecida)
    #[serde(default)]
    pub date: String,
}

/// Metadados `{"refs": [...]}` entregues ao chamador
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefsMetadata {
    /// Uma entrada por grounding chunk com descritor web completo
    pub refs: Vec<Ref>,
}
