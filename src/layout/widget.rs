use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// A data-described UI node, as produced by the layout source.
///
/// The engine never mutates a widget after load; it only reads `render_kind` and `widget_id`
/// when matching pops and indexing pushables. Everything else is for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    /// Name of the render function that draws this node (e.g. `"Button"`).
    #[serde(alias = "rname")]
    pub render_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
    #[serde(default, alias = "cspec")]
    pub config: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Widget>>,
}

impl Widget {
    pub fn new(render_kind: impl Into<String>) -> Self {
        Self {
            render_kind: render_kind.into(),
            widget_id: None,
            config: Map::new(),
            children: None,
        }
    }

    pub fn with_id(mut self, widget_id: impl Into<String>) -> Self {
        self.widget_id = Some(widget_id.into());
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn with_children(mut self, children: Vec<Widget>) -> Self {
        self.children = Some(children);
        self
    }

    /// The widget's identity, if it has a non-empty id.
    pub fn id(&self) -> Option<&str> {
        self.widget_id.as_deref().filter(|id| !id.is_empty())
    }

    /// True when `name_or_id` equals either the render kind or the widget id.
    pub fn matches(&self, name_or_id: &str) -> bool {
        self.render_kind == name_or_id || self.id() == Some(name_or_id)
    }

    /// Short label for logs: the id when present, otherwise the render kind.
    pub fn label(&self) -> &str {
        self.id().unwrap_or(&self.render_kind)
    }
}

/// Top-level widgets with a non-empty id, available for insertion onto the render stack.
#[derive(Debug, Clone, Default)]
pub struct Pushables {
    widgets: AHashMap<String, Arc<Widget>>,
}

impl Pushables {
    /// Indexes every top-level widget that carries a non-empty `widget_id`.
    pub fn from_layout(layout: &[Arc<Widget>]) -> Self {
        let mut pushables = Self::default();
        for widget in layout {
            match widget.id() {
                Some(_) => pushables.insert(Arc::clone(widget)),
                None if widget.widget_id.is_some() => {
                    warn!(render_kind = %widget.render_kind, "empty widget_id in layout, not pushable");
                }
                None => {}
            }
        }
        pushables
    }

    /// Adds a widget under its id. Widgets without an id are ignored.
    pub fn insert(&mut self, widget: Arc<Widget>) {
        if let Some(id) = widget.id() {
            debug!(widget_id = %id, render_kind = %widget.render_kind, "registered pushable");
            self.widgets.insert(id.to_string(), Arc::clone(&widget));
        }
    }

    pub fn get(&self, widget_id: &str) -> Option<&Arc<Widget>> {
        self.widgets.get(widget_id)
    }

    pub fn contains(&self, widget_id: &str) -> bool {
        self.widgets.contains_key(widget_id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
