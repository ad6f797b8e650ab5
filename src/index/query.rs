//! Query engine - retrieve relevant nodes and synthesize an answer

use std::fmt;

use tracing::{debug, info};

use super::vector_index::VectorStoreIndex;
use crate::chunker::Node;

/// Answer text when nothing could be retrieved
pub const EMPTY_RESPONSE: &str = "Empty Response";

const TEXT_QA_PROMPT: &str = "Context information is below.\n\
---------------------\n\
{context_str}\n\
---------------------\n\
Given the context information and not prior knowledge, answer the query.\n\
Query: {query_str}\n\
Answer: ";

/// A retrieved node with its similarity to the query
#[derive(Debug, Clone)]
pub struct NodeWithScore {
    pub node: Node,
    pub score: f32,
}

/// Synthesized answer and the nodes it was built from
#[derive(Debug, Clone)]
pub struct Response {
    pub response: String,
    pub source_nodes: Vec<NodeWithScore>,
}

impl Response {
    /// One line per source node: `> Source (Doc id: ..): <text prefix>`
    pub fn formatted_sources(&self, length: usize) -> String {
        self.source_nodes
            .iter()
            .map(|source| {
                let text: String = source.node.text.chars().take(length).collect();
                let ellipsis = if source.node.text.chars().count() > length { "..." } else { "" };
                format!(
                    "> Source (Doc id: {}, score {:.4}): {}{}",
                    source.node.ref_doc_id,
                    source.score,
                    text.replace('\n', " "),
                    ellipsis
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response)
    }
}

/// Query engine over a borrowed index
pub struct QueryEngine<'a> {
    index: &'a VectorStoreIndex,
    similarity_top_k: usize,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a VectorStoreIndex, similarity_top_k: usize) -> Self {
        Self {
            index,
            similarity_top_k,
        }
    }

    pub fn with_similarity_top_k(mut self, top_k: usize) -> Self {
        self.similarity_top_k = top_k;
        self
    }

    /// Nodes most similar to the query, best first
    pub async fn retrieve(&self, query: &str) -> anyhow::Result<Vec<NodeWithScore>> {
        let ctx = &self.index.service_context;
        let query_embedding = ctx
            .embed_model
            .embed(&[query])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Embedding model returned no vector for the query"))?;

        let hits = self
            .index
            .vector_store
            .query(&query_embedding, self.similarity_top_k)?;

        let mut nodes = Vec::with_capacity(hits.len());
        for (key, score) in hits {
            let node_id = self
                .index
                .index_store
                .node_id(key)
                .ok_or_else(|| anyhow::anyhow!("Vector key {} has no node in the index", key))?;
            let node = self.index.docstore.get_node(node_id)?.clone();
            debug!("Retrieved node {} (score {:.4})", node.id, score);
            nodes.push(NodeWithScore { node, score });
        }

        Ok(nodes)
    }

    /// Retrieve context and ask the LLM to answer from it
    pub async fn query(&self, query: &str) -> anyhow::Result<Response> {
        let source_nodes = self.retrieve(query).await?;

        if source_nodes.is_empty() {
            info!("No nodes retrieved for query");
            return Ok(Response {
                response: EMPTY_RESPONSE.to_string(),
                source_nodes,
            });
        }

        let prompt = text_qa_prompt(&source_nodes, query);
        let answer = self.index.service_context.llm.complete(&prompt).await?;

        Ok(Response {
            response: answer.trim().to_string(),
            source_nodes,
        })
    }
}

/// Fill the text-QA template with retrieved node texts and the query
fn text_qa_prompt(nodes: &[NodeWithScore], query: &str) -> String {
    let context = nodes
        .iter()
        .map(|n| n.node.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    TEXT_QA_PROMPT
        .replace("{context_str}", &context)
        .replace("{query_str}", query)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::embedding::SimulatedEmbedding;
    use crate::llm::SimulatedLlm;
    use crate::reader::Document;
    use crate::service::ServiceContext;

    fn node_with_score(text: &str, score: f32) -> NodeWithScore {
        NodeWithScore {
            node: Node {
                id: "n".into(),
                ref_doc_id: "d".into(),
                text: text.into(),
                metadata: serde_json::Value::Null,
            },
            score,
        }
    }

    async fn index(texts: &[&str]) -> VectorStoreIndex {
        let ctx = ServiceContext::new(
            Arc::new(SimulatedLlm::default()),
            Arc::new(SimulatedEmbedding::default()),
        );
        let docs: Vec<Document> = texts
            .iter()
            .map(|t| Document::new(*t, serde_json::json!({})))
            .collect();
        VectorStoreIndex::from_documents(&docs, ctx).await.unwrap()
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = text_qa_prompt(
            &[node_with_score("First passage.", 0.9), node_with_score("Second passage.", 0.8)],
            "What is it?",
        );
        assert!(prompt.starts_with("Context information is below.\n---------------------\n"));
        assert!(prompt.contains("First passage.\n\nSecond passage.\n---------------------\n"));
        assert!(prompt.ends_with("Query: What is it?\nAnswer: "));
    }

    #[test]
    fn test_formatted_sources() {
        let response = Response {
            response: "answer".into(),
            source_nodes: vec![node_with_score("abcdef\nghij", 0.5)],
        };
        assert_eq!(
            response.formatted_sources(4),
            "> Source (Doc id: d, score 0.5000): abcd..."
        );
        assert_eq!(response.to_string(), "answer");
    }

    #[tokio::test]
    async fn test_retrieve_ranks_relevant_node_first() {
        let index = index(&[
            "Sourdough bread needs flour, water and a starter.",
            "To open a Lightning channel, press the plus symbol and click OPEN.",
            "Bitcoin blocks arrive roughly every ten minutes.",
        ])
        .await;

        let engine = index.as_query_engine().with_similarity_top_k(1);
        let nodes = engine.retrieve("How to open a Lightning channel?").await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].node.text.contains("Lightning channel"));
    }

    #[tokio::test]
    async fn test_query_returns_sources() {
        let index = index(&["Channels need a funding transaction.", "Fees are paid in sats."]).await;

        let response = index.as_query_engine().query("How are channels funded?").await.unwrap();
        assert!(!response.response.is_empty());
        assert_eq!(response.source_nodes.len(), 2);
        assert!(response.source_nodes[0].score >= response.source_nodes[1].score);
    }

    #[tokio::test]
    async fn test_zero_top_k_is_empty_response() {
        let index = index(&["Channels need a funding transaction."]).await;

        let response = index
            .as_query_engine()
            .with_similarity_top_k(0)
            .query("anything")
            .await
            .unwrap();
        assert_eq!(response.response, EMPTY_RESPONSE);
        assert!(response.source_nodes.is_empty());
    }
}
