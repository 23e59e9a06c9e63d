//! SVG flamegraph generation from collapsed stacks.
//!
//! Layout follows the usual flamegraph conventions:
//! - Root at the bottom, one row per stack level
//! - Frame width proportional to accumulated self time below it
//! - Warm palette hashed from the frame name, so colours are stable
//!   between runs

use crate::aggregator::CollapsedStack;
use crate::utils::config::{
    DEFAULT_FLAMEGRAPH_TITLE, DEFAULT_FLAMEGRAPH_WIDTH, DEFAULT_MIN_FRAME_WIDTH, STACK_SEPARATOR,
};
use crate::utils::error::FlamegraphError;
use crate::utils::settings::FlamegraphSettings;
use log::info;
use std::collections::HashMap;
use std::fmt::Write;

/// Categories for flamegraph nodes to determine colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Root,
    Thread,
    Function,
}

impl NodeCategory {
    /// Classify a node by its depth in the tree (root is level 0)
    pub fn from_level(level: usize) -> Self {
        match level {
            0 => Self::Root,
            1 => Self::Thread,
            _ => Self::Function,
        }
    }
}

/// Flamegraph configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FlamegraphConfig {
    pub title: String,
    pub width: usize,
    /// Frames narrower than this (in pixels) are skipped
    pub min_width: f64,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_FLAMEGRAPH_TITLE.to_string(),
            width: DEFAULT_FLAMEGRAPH_WIDTH,
            min_width: DEFAULT_MIN_FRAME_WIDTH,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }
}

impl From<&FlamegraphSettings> for FlamegraphConfig {
    fn from(settings: &FlamegraphSettings) -> Self {
        Self {
            title: settings.title.clone(),
            width: settings.width,
            min_width: settings.min_width,
        }
    }
}

/// Internal Node structure for building the tree
struct Node {
    name: String,
    value: u64,
    level: usize,
    children: HashMap<String, usize>,
}

/// Frame tree stored flat; index 0 is the root.
///
/// Stacks can be as deep as the traced recursion, so nothing here recurses.
struct FrameTree {
    nodes: Vec<Node>,
    max_level: usize,
}

impl FrameTree {
    fn new(root: &str) -> Self {
        Self {
            nodes: vec![Node {
                name: root.to_string(),
                value: 0,
                level: 0,
                children: HashMap::new(),
            }],
            max_level: 0,
        }
    }

    fn root(&self) -> &Node {
        &self.nodes[0]
    }

    fn insert(&mut self, stack: &str, value: u64) {
        let mut current = 0;
        self.nodes[current].value += value;

        for frame in stack.split(STACK_SEPARATOR) {
            let next = match self.nodes[current].children.get(frame) {
                Some(&index) => index,
                None => {
                    let index = self.nodes.len();
                    let level = self.nodes[current].level + 1;
                    self.nodes.push(Node {
                        name: frame.to_string(),
                        value: 0,
                        level,
                        children: HashMap::new(),
                    });
                    self.nodes[current]
                        .children
                        .insert(frame.to_string(), index);
                    self.max_level = self.max_level.max(level);
                    index
                }
            };
            self.nodes[next].value += value;
            current = next;
        }
    }

    /// Children heaviest first, ties broken by name for stable output
    fn sorted_children(&self, index: usize) -> Vec<usize> {
        let mut children: Vec<usize> = self.nodes[index].children.values().copied().collect();
        children.sort_by(|&a, &b| {
            let (a, b) = (&self.nodes[a], &self.nodes[b]);
            b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name))
        });
        children
    }
}

/// Generate SVG flamegraph from collapsed stacks
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    if stacks.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    let config = config.cloned().unwrap_or_default();
    info!("Generating flamegraph with {} stacks", stacks.len());

    let mut tree = FrameTree::new("all");
    for stack in stacks {
        tree.insert(&stack.stack, stack.weight);
    }

    let max_depth = tree.max_level;

    let width = config.width;
    let line_height = 18;
    let title_height = 30;
    let graph_height = (max_depth + 1) * line_height;
    let total_height = title_height + graph_height + 10;

    let mut svg_content = String::new();
    let _ = write!(
        svg_content,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        width, total_height, width, total_height
    );
    svg_content.push_str(
        r#"<style>.func { font: 11px monospace; } .func:hover { stroke: black; stroke-width: 1; cursor: pointer; }</style>"#,
    );
    let _ = write!(
        svg_content,
        r#"<text x="{}" y="20" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2,
        escape_xml(&config.title)
    );

    let mut ctx = RenderContext {
        output: &mut svg_content,
        line_height,
        baseline: title_height + graph_height,
        total: tree.root().value,
        min_width: config.min_width,
    };

    // Every call still open or zero-length: draw the tree evenly
    let weighted = tree.root().value > 0;
    render_tree(&tree, weighted, width as f64, &mut ctx);

    svg_content.push_str("</svg>");

    info!(
        "Flamegraph generated successfully ({} bytes)",
        svg_content.len()
    );
    Ok(svg_content)
}

/// Fill colour for a frame
pub fn frame_color(name: &str, category: NodeCategory) -> String {
    match category {
        NodeCategory::Root => "rgb(160, 160, 160)".to_string(),
        NodeCategory::Thread => "rgb(100, 149, 237)".to_string(),
        NodeCategory::Function => {
            let hash = name_hash(name);
            let r = 205 + (hash % 50) as u8;
            let g = ((hash >> 8) % 230) as u8;
            let b = ((hash >> 16) % 55) as u8;
            format!("rgb({}, {}, {})", r, g, b)
        }
    }
}

/// FNV-1a, stable across platforms and releases
fn name_hash(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

struct RenderContext<'a> {
    output: &'a mut String,
    line_height: usize,
    baseline: usize,
    total: u64,
    min_width: f64,
}

/// Depth-first layout with an explicit work stack, parents before
/// children and heavier siblings first
fn render_tree(tree: &FrameTree, weighted: bool, width: f64, ctx: &mut RenderContext) {
    let mut pending: Vec<(usize, f64, f64)> = vec![(0, 0.0, width)];

    while let Some((index, x, w)) = pending.pop() {
        if w < ctx.min_width {
            continue;
        }

        let node = &tree.nodes[index];
        draw_frame(node, x, w, ctx);

        let children = tree.sorted_children(index);
        if children.is_empty() {
            continue;
        }

        let mut placed = Vec::with_capacity(children.len());
        let mut current_x = x;
        for (position, &child) in children.iter().enumerate() {
            let child_w = if weighted {
                (tree.nodes[child].value as f64 / node.value as f64) * w
            } else {
                w / children.len() as f64
            };
            if weighted && child_w <= 0.0 {
                continue;
            }
            let child_x = if weighted {
                current_x
            } else {
                x + position as f64 * child_w
            };
            placed.push((child, child_x, child_w));
            current_x += child_w;
        }

        pending.extend(placed.into_iter().rev());
    }
}

fn draw_frame(node: &Node, x: f64, w: f64, ctx: &mut RenderContext) {
    let level = node.level;
    let category = NodeCategory::from_level(level);
    let color = frame_color(&node.name, category);

    // Inverted: row 0 sits on the baseline
    let y = ctx.baseline as f64 - ((level + 1) * ctx.line_height) as f64;

    let percentage = if ctx.total > 0 {
        node.value as f64 / ctx.total as f64 * 100.0
    } else {
        0.0
    };
    let name = escape_xml(&node.name);

    let _ = write!(
        ctx.output,
        r#"<g class="func"><title>{} ({} units, {:.2}%)</title><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{}" fill="{}" stroke="white" stroke-width="0.5"/>"#,
        name,
        node.value,
        percentage,
        x,
        y,
        w,
        ctx.line_height - 1,
        color
    );

    if let Some(display_name) = get_truncated_name(&node.name, w) {
        let _ = write!(
            ctx.output,
            r#"<text x="{:.2}" y="{:.2}" dx="3" dy="12" font-size="11" pointer-events="none">{}</text>"#,
            x,
            y,
            escape_xml(&display_name)
        );
    }

    ctx.output.push_str("</g>");
}

/// Calculate truncated name for a node based on width
pub fn get_truncated_name(name: &str, width: f64) -> Option<String> {
    const MIN_LABEL_WIDTH: f64 = 30.0;
    const CHAR_WIDTH: f64 = 7.0;

    if width <= MIN_LABEL_WIDTH || name.is_empty() {
        return None;
    }

    let max_chars = (width / CHAR_WIDTH) as usize;
    let char_count = name.chars().count();
    if char_count > max_chars && max_chars > 3 {
        let kept: String = name.chars().take(max_chars - 2).collect();
        Some(format!("{}..", kept))
    } else if char_count <= max_chars {
        Some(name.to_string())
    } else {
        None
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
