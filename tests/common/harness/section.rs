//! Builder for test sections.

use doctor::infra::section_slug;

/// Builder for section files placed directly into a project.
///
/// By default the file starts with a `# Title` heading, like sections
/// created through `doctor add`.
#[derive(Debug)]
pub struct TestSection {
    index: usize,
    title: String,
    heading: bool,
    body: String,
}

#[allow(dead_code)]
impl TestSection {
    /// Creates a section with the given index and title.
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            heading: true,
            body: String::new(),
        }
    }

    /// Leaves out the heading, so the title comes from the filename.
    pub fn without_heading(mut self) -> Self {
        self.heading = false;
        self
    }

    /// Sets the text after the heading.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the filename, e.g. `02_Method.md`.
    pub fn filename(&self) -> String {
        format!("{:02}_{}.md", self.index, section_slug(&self.title))
    }

    /// Returns the file content.
    pub fn content(&self) -> String {
        if self.heading {
            format!("# {}\n\n{}", self.title, self.body)
        } else {
            self.body.clone()
        }
    }
}
