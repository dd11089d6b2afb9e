//! Client-side interaction state: the hover preview, the jumbo viewer and
//! the pager buttons.
//!
//! Pure state machines with no DOM access, so they run unchanged inside the
//! hydrated WASM bundle and in native unit tests.

/// `data-src` value marking a row that has no image.
pub const NO_IMAGE: &str = "Null";

/// Distance of the floating preview from the pointer, in CSS pixels.
pub const PREVIEW_OFFSET: (i32, i32) = (40, 40);

// ─── Hover preview + jumbo viewer ────────────────────────────────────────────

/// Hover state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Preview {
    #[default]
    Idle,
    Previewing { src: String },
}

/// Hover preview and jumbo viewer.
///
/// The preview element is created once and reused; leaving a row only hides
/// it.  The jumbo viewer is independent of hover state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewer {
    preview: Preview,
    left: i32,
    top: i32,
    /// Source of the preview `<img>`.  Set on the first preview and kept
    /// afterwards, so the element is created once.
    element: Option<String>,
    jumbo: Option<String>,
}

/// Whether a row's `data-src` refers to an actual image.
pub fn has_image(src: &str) -> bool {
    !src.is_empty() && src != NO_IMAGE
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self.preview, Preview::Previewing { .. })
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// Source of the preview image, if one is showing.
    pub fn preview_src(&self) -> Option<&str> {
        match &self.preview {
            Preview::Previewing { src } => Some(src),
            Preview::Idle => None,
        }
    }

    /// Source of the preview element, hidden or not.  `None` until a row
    /// with an image has been hovered.
    pub fn preview_element(&self) -> Option<&str> {
        self.element.as_deref()
    }

    /// Preview position as CSS `(left, top)` in page pixels.
    pub fn position(&self) -> (i32, i32) {
        (self.left, self.top)
    }

    /// Image currently loaded in the jumbo viewer.
    pub fn jumbo(&self) -> Option<&str> {
        self.jumbo.as_deref()
    }

    /// Pointer entered a row.  Returns `true` when a preview is now shown.
    pub fn pointer_enter(&mut self, src: &str, page_x: i32, page_y: i32) -> bool {
        if !has_image(src) {
            return false;
        }
        self.preview = Preview::Previewing {
            src: src.to_string(),
        };
        self.element = Some(src.to_string());
        self.move_to(page_x, page_y);
        true
    }

    /// Pointer moved within the table.  Ignored while idle.
    pub fn pointer_move(&mut self, page_x: i32, page_y: i32) {
        if self.is_previewing() {
            self.move_to(page_x, page_y);
        }
    }

    /// Pointer left the row: hide the preview and park it at the origin.
    pub fn pointer_leave(&mut self) {
        self.preview = Preview::Idle;
        self.left = 0;
        self.top = 0;
    }

    /// Row clicked.  Returns `true` when the jumbo viewer changed.
    pub fn click(&mut self, src: &str) -> bool {
        if !has_image(src) {
            return false;
        }
        self.jumbo = Some(src.to_string());
        true
    }

    fn move_to(&mut self, page_x: i32, page_y: i32) {
        self.left = page_x + PREVIEW_OFFSET.0;
        self.top = page_y + PREVIEW_OFFSET.1;
    }
}

// ─── Pager ───────────────────────────────────────────────────────────────────

/// Page request raised by a pager button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Prev,
    Next,
}

impl PageRequest {
    /// Name of the custom event the button dispatches.
    pub fn event_name(self) -> &'static str {
        match self {
            PageRequest::Prev => "goPrev",
            PageRequest::Next => "goNext",
        }
    }
}

/// Forward/back navigation over cursor-paginated results.
///
/// Keeps the cursor each visited page started from, so going back returns
/// to exactly the page that was shown before.  Buttons are enabled or
/// disabled by comparing the displayed page numbers as strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Pager {
    starts: Vec<Option<String>>,
    next: Option<String>,
    last: Option<usize>,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Pager {
    /// Start on page 1 at `cursor` (`None` for the newest images).
    pub fn new(cursor: Option<String>) -> Self {
        Pager {
            starts: vec![cursor],
            next: None,
            last: None,
        }
    }

    /// Cursor the current page should be loaded from.
    pub fn current_cursor(&self) -> Option<&str> {
        self.starts.last().and_then(|c| c.as_deref())
    }

    /// Displayed number of the current page, starting at "1".
    pub fn current_label(&self) -> String {
        self.starts.len().to_string()
    }

    /// Displayed number of the last page, once the store has reported it.
    pub fn last_label(&self) -> Option<String> {
        self.last.map(|n| n.to_string())
    }

    pub fn prev_disabled(&self) -> bool {
        self.current_label() == "1"
    }

    pub fn next_disabled(&self) -> bool {
        self.last_label().as_deref() == Some(self.current_label().as_str())
    }

    /// Record the continuation cursor returned for the current page.
    pub fn loaded(&mut self, next: Option<String>) {
        if next.is_none() {
            self.last = Some(self.starts.len());
        }
        self.next = next;
    }

    /// Apply a button press.  Returns `true` when the current page changed
    /// and must be fetched again.
    pub fn request(&mut self, request: PageRequest) -> bool {
        match request {
            PageRequest::Prev => self.go_prev(),
            PageRequest::Next => self.go_next(),
        }
    }

    fn go_prev(&mut self) -> bool {
        if self.prev_disabled() {
            return false;
        }
        self.next = self.starts.pop().flatten();
        true
    }

    fn go_next(&mut self) -> bool {
        if self.next_disabled() {
            return false;
        }
        match self.next.take() {
            Some(cursor) => {
                self.starts.push(Some(cursor));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://cdn.example/pond.jpg";

    #[test]
    fn test_sentinel_never_previews() {
        let mut v = Viewer::new();
        assert!(!v.pointer_enter(NO_IMAGE, 10, 10));
        v.pointer_move(20, 20);
        assert!(!v.is_previewing());
        assert_eq!(v.preview_src(), None);
        assert_eq!(v.preview_element(), None);
        assert_eq!(v.position(), (0, 0));
    }

    #[test]
    fn test_hover_cycle() {
        let mut v = Viewer::new();
        assert!(v.pointer_enter(URL, 100, 200));
        assert_eq!(v.preview_src(), Some(URL));
        assert_eq!(v.position(), (140, 240));

        v.pointer_move(110, 205);
        assert_eq!(v.position(), (150, 245));

        v.pointer_leave();
        assert_eq!(*v.preview(), Preview::Idle);
        assert_eq!(v.position(), (0, 0));
        // Hidden, not torn down.
        assert_eq!(v.preview_element(), Some(URL));

        // Moves while idle do not reposition anything.
        v.pointer_move(300, 300);
        assert_eq!(v.position(), (0, 0));
    }

    #[test]
    fn test_enter_other_row_swaps_source() {
        let mut v = Viewer::new();
        v.pointer_enter(URL, 0, 0);
        v.pointer_enter("https://cdn.example/moon.jpg", 5, 5);
        assert_eq!(v.preview_src(), Some("https://cdn.example/moon.jpg"));
        assert!(v.is_previewing());
    }

    #[test]
    fn test_click_sets_jumbo() {
        let mut v = Viewer::new();
        assert!(v.click(URL));
        assert_eq!(v.jumbo(), Some(URL));
        assert!(!v.is_previewing());

        assert!(!v.click(NO_IMAGE));
        assert_eq!(v.jumbo(), Some(URL));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(PageRequest::Prev.event_name(), "goPrev");
        assert_eq!(PageRequest::Next.event_name(), "goNext");
    }

    #[test]
    fn test_pager_first_page() {
        let mut p = Pager::default();
        assert!(p.prev_disabled());
        assert!(!p.next_disabled());
        assert!(!p.request(PageRequest::Prev));

        p.loaded(Some("c1".into()));
        assert!(!p.next_disabled());
        assert!(p.request(PageRequest::Next));
        assert_eq!(p.current_label(), "2");
        assert_eq!(p.current_cursor(), Some("c1"));
        assert!(!p.prev_disabled());
    }

    #[test]
    fn test_pager_last_page_and_back() {
        let mut p = Pager::default();
        p.loaded(Some("c1".into()));
        p.request(PageRequest::Next);
        p.loaded(None);

        assert_eq!(p.last_label().as_deref(), Some("2"));
        assert!(p.next_disabled());
        assert!(!p.request(PageRequest::Next));

        assert!(p.request(PageRequest::Prev));
        assert_eq!(p.current_label(), "1");
        assert_eq!(p.current_cursor(), None);
        assert!(p.prev_disabled());
        assert!(!p.next_disabled());

        // The cursor of the page we left is available again.
        assert!(p.request(PageRequest::Next));
        assert_eq!(p.current_cursor(), Some("c1"));
    }

    #[test]
    fn test_single_page_disables_both() {
        let mut p = Pager::default();
        p.loaded(None);
        assert!(p.prev_disabled());
        assert!(p.next_disabled());
    }
}
