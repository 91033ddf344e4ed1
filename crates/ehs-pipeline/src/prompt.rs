//! Prompt composition from an ordered list of sections.
//!
//! A section is either fixed text or a clause function that may decline to contribute.
//! Sections render in declaration order and are joined with a blank line, so the
//! relative order of optional clauses is fixed by how the builder was assembled.

/// Renders one clause from the request, or nothing.
pub type ClauseFn<I> = fn(&I) -> Option<String>;

enum Section<I> {
    Fixed(&'static str, &'static str),
    Clause(&'static str, ClauseFn<I>),
}

impl<I> Section<I> {
    fn name(&self) -> &'static str {
        match self {
            Section::Fixed(name, _) | Section::Clause(name, _) => name,
        }
    }

    fn render(&self, input: &I) -> Option<String> {
        match self {
            Section::Fixed(_, text) => Some((*text).to_string()),
            Section::Clause(_, clause) => clause(input),
        }
    }
}

pub struct PromptBuilder<I> {
    sections: Vec<Section<I>>,
}

impl<I> Default for PromptBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> PromptBuilder<I> {
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    pub fn fixed(mut self, name: &'static str, text: &'static str) -> Self {
        self.sections.push(Section::Fixed(name, text));
        self
    }

    pub fn clause(mut self, name: &'static str, clause: ClauseFn<I>) -> Self {
        self.sections.push(Section::Clause(name, clause));
        self
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(Section::name).collect()
    }

    /// Names of the sections that contribute text for this input, in render order.
    pub fn active_sections(&self, input: &I) -> Vec<&'static str> {
        self.sections
            .iter()
            .filter(|section| section.render(input).is_some())
            .map(Section::name)
            .collect()
    }

    pub fn render(&self, input: &I) -> String {
        self.sections
            .iter()
            .filter_map(|section| section.render(input))
            .map(|text| text.trim_end().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
