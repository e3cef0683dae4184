pub const SELECT_PROMPT: &str = "Select...";
pub const LOADING_LABEL: &str = "Loading...";
pub const LEAGUES_ERROR_LABEL: &str = "Error loading leagues";
pub const TEAMS_ERROR_LABEL: &str = "Error loading teams";

pub const ANALYZE_LABEL: &str = "Analyze Matchup";
pub const ANALYZE_BUSY_LABEL: &str = "Analyzing...";

// ---------------------------------------------------------------------------
// Select control
// ---------------------------------------------------------------------------

/// One choice in a select control. An empty value marks the placeholder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self { value: String::new(), label: label.into() }
    }
}

#[derive(Debug, Clone)]
pub struct SelectControl {
    options: Vec<SelectOption>,
    selected: usize,
    disabled: bool,
}

impl Default for SelectControl {
    fn default() -> Self {
        Self::placeholder(SELECT_PROMPT)
    }
}

impl SelectControl {
    /// A control holding a single, valueless row (prompt, loading or error text).
    pub fn placeholder(label: impl Into<String>) -> Self {
        Self { options: vec![SelectOption::placeholder(label)], selected: 0, disabled: false }
    }

    /// The "choose one" prompt followed by one row per `(value, label)` pair.
    pub fn with_choices<I, V, L>(choices: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        let mut options = vec![SelectOption::placeholder(SELECT_PROMPT)];
        options.extend(
            choices
                .into_iter()
                .map(|(value, label)| SelectOption { value: value.into(), label: label.into() }),
        );
        Self { options, selected: 0, disabled: false }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> &str {
        self.options.get(self.selected).map(|o| o.label.as_str()).unwrap_or_default()
    }

    /// The chosen value, `None` while the placeholder row is selected.
    pub fn value(&self) -> Option<&str> {
        self.options
            .get(self.selected)
            .map(|o| o.value.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Returns true when the selection moved.
    pub fn select_next(&mut self) -> bool {
        if self.disabled || self.selected + 1 >= self.options.len() {
            return false;
        }
        self.selected += 1;
        true
    }

    pub fn select_prev(&mut self) -> bool {
        if self.disabled || self.selected == 0 {
            return false;
        }
        self.selected -= 1;
        true
    }

    /// Select the row carrying `value`; `None` selects the placeholder.
    /// Unknown values leave the selection untouched and return false.
    pub fn select_value(&mut self, value: Option<&str>) -> bool {
        let target = value.unwrap_or_default();
        match self.options.iter().position(|o| o.value == target) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Analyze trigger
// ---------------------------------------------------------------------------

/// The analyze trigger: disabled and relabelled while a request is in flight.
#[derive(Debug, Default)]
pub struct AnalyzeButton {
    busy: bool,
}

impl AnalyzeButton {
    pub fn begin(&mut self) {
        self.busy = true;
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn label(&self) -> &'static str {
        if self.busy { ANALYZE_BUSY_LABEL } else { ANALYZE_LABEL }
    }
}

// ---------------------------------------------------------------------------
// Collapsible sections
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Tips,
    Accumulator,
}

#[derive(Debug, Default)]
pub struct Collapsible {
    expanded: bool,
}

impl Collapsible {
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    pub fn expand(&mut self) {
        self.expanded = true;
    }

    pub fn glyph(&self) -> &'static str {
        if self.expanded { "–" } else { "+" }
    }
}

/// Both sections start collapsed.
#[derive(Debug, Default)]
pub struct Sections {
    pub tips: Collapsible,
    pub accumulator: Collapsible,
}

impl Sections {
    pub fn get(&self, section: Section) -> &Collapsible {
        match section {
            Section::Tips => &self.tips,
            Section::Accumulator => &self.accumulator,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut Collapsible {
        match section {
            Section::Tips => &mut self.tips,
            Section::Accumulator => &mut self.accumulator,
        }
    }
}
