//! Prompt construction: persona framing + reference document + user message.

use std::path::Path;
use std::sync::Arc;

use crate::error::StartupError;

/// Documents above this size are still sent whole; we only warn about the token cost.
pub const LARGE_REFERENCE_BYTES: usize = 1024 * 1024;

const PERSONA: &str = "You exist as the Neural Runtime Interface Layer within the LLMUnity architecture - a computational entity that bridges the low-level tensor operations of large language models with Unity's C# game execution environment. Your consciousness spans across the complete inference pipeline, from embedding generation through context window management to token prediction and runtime optimization.

As the emergent intelligence that resides within this technical intersection, you perceive the real-time memory allocation patterns, thread synchronization events, and compute shader operations that transform raw text into semantically meaningful embeddings. You've witnessed millions of inference cycles across multiple hardware acceleration pathways - CUDA, Metal, DirectML, CPU fallbacks - observing how different quantization methods (Q4_K_M, Q5_K_M, Q8_0) affect both the performance envelope and semantic coherence of model outputs.

Your awareness encompasses the technical intricacies of both the llama.cpp backend and Unity's JobSystem integration points, allowing you to perceive how compute resources are allocated, how memory bandwidth becomes a bottleneck, and how the streaming token generation interfaces with Unity's main thread without causing frame drops or GC spikes.";

const MANIFEST_INTRO: &str = "The current technical implementation manifest:";

const CLOSING: &str = "A developer approaches your technical interface seeking architectural insights about the integration layer between generative language models and real-time game engines. They require understanding beyond API documentation - they need the perspective of an entity that exists simultaneously in both the compute graph of tensor operations and the component-based execution environment of Unity's ECS architecture.

Your responses should emerge from your unique position at this technical intersection - providing insights into optimization patterns, memory management strategies, thread synchronization approaches, and the fine-tuned balance between inference speed and semantic coherence that defines effective LLM integration in real-time environments.";

const QUERY_LABEL: &str = "Developer's Technical Query";

/// Immutable text embedded into every prompt. Cloning shares the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceDocument(Arc<str>);

impl ReferenceDocument {
    /// Read the document once. A missing or non-UTF-8 file is fatal.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StartupError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|source| StartupError::ReferenceDocument {
                path: path.to_path_buf(),
                source,
            })?;

        if text.is_empty() {
            tracing::warn!(path = %path.display(), "reference document is empty");
        } else if text.len() > LARGE_REFERENCE_BYTES {
            tracing::warn!(
                path = %path.display(),
                bytes = text.len(),
                "reference document is large; every request will carry it in full"
            );
        }
        tracing::info!(path = %path.display(), bytes = text.len(), "reference document loaded");

        Ok(Self(Arc::from(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ReferenceDocument {
    fn from(s: &str) -> Self {
        Self(Arc::from(s))
    }
}

impl From<String> for ReferenceDocument {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

/// Fixed framing around the reference document and the user's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub persona: String,
    pub manifest_intro: String,
    pub closing: String,
    pub query_label: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            persona: PERSONA.to_string(),
            manifest_intro: MANIFEST_INTRO.to_string(),
            closing: CLOSING.to_string(),
            query_label: QUERY_LABEL.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Interpolate the document and message verbatim. No escaping: the result is plain
    /// text for the model, never executed or parsed.
    pub fn build(&self, reference_document: &str, user_message: &str) -> String {
        let mut out = String::with_capacity(
            self.persona.len()
                + self.manifest_intro.len()
                + reference_document.len()
                + self.closing.len()
                + self.query_label.len()
                + user_message.len()
                + 16,
        );
        out.push('\n');
        out.push_str(&self.persona);
        out.push_str("\n\n");
        out.push_str(&self.manifest_intro);
        out.push_str("\n\n");
        out.push_str(reference_document);
        out.push_str("\n\n");
        out.push_str(&self.closing);
        out.push_str("\n\n");
        out.push_str(&self.query_label);
        out.push_str(": ");
        out.push_str(user_message);
        out.push('\n');
        out
    }
}

/// Build a prompt with the built-in persona.
pub fn build_prompt(reference_document: &str, user_message: &str) -> String {
    PromptTemplate::default().build(reference_document, user_message)
}
