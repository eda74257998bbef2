//! Prompt assembly for the generation collaborator

/// Builder for constructing prompts from retrieved context
pub struct PromptBuilder {
    system_instruction: String,
    context_sections: Vec<String>,
    question: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            system_instruction: String::new(),
            context_sections: Vec::new(),
            question: String::new(),
        }
    }

    /// Set the system instruction
    pub fn system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    /// Add a context section
    pub fn add_context(mut self, context: impl Into<String>) -> Self {
        self.context_sections.push(context.into());
        self
    }

    /// Set the question
    pub fn question(mut self, q: impl Into<String>) -> Self {
        self.question = q.into();
        self
    }

    /// Build the final prompt
    pub fn build(self) -> String {
        let mut prompt = String::new();

        if !self.system_instruction.is_empty() {
            prompt.push_str(&self.system_instruction);
            prompt.push_str("\n\n");
        }

        if !self.context_sections.is_empty() {
            prompt.push_str("Context:\n");
            for section in &self.context_sections {
                prompt.push_str(section);
                prompt.push_str("\n\n");
            }
        }

        if !self.question.is_empty() {
            prompt.push_str("Question: ");
            prompt.push_str(&self.question);
            prompt.push('\n');
        }

        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble the standard RAG prompt for a question and its retrieved
/// context.
///
/// An empty context string means retrieval found nothing (or the index is
/// unavailable); the prompt then tells the model to say that no documents
/// are loaded instead of inventing sources.
pub fn rag_prompt(question: &str, context: &str) -> String {
    if context.is_empty() {
        return PromptBuilder::new()
            .system(
                "You are a personal document assistant. No documents are \
                 currently indexed. Tell the user that no documents are \
                 loaded and answer from general knowledge only if they ask \
                 you to.",
            )
            .question(question)
            .build();
    }

    PromptBuilder::new()
        .system(
            "You are a personal document assistant. Answer using only the \
             provided context. If the context does not contain the answer, \
             say so.",
        )
        .add_context(context)
        .question(question)
        .build()
}
