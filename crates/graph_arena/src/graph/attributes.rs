//! # Display Attributes
//!
//! Plain attribute values copied onto nodes and edges. The syntax-tree
//! walker keeps one [`NodeAttributes`] and one [`EdgeAttributes`] per scope
//! as the "default node" and "default edge"; every allocation copies from
//! the scope's default.

use std::rc::Rc;

use bytemuck::{Pod, Zeroable};

/// Shared, immutable text attached to nodes and edges.
///
/// Titles are shared between a node and the title index, so cloning is
/// a reference-count bump.
pub type Text = Rc<str>;

/// Index into the colormap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u8);

impl Color {
    /// Colormap entry 0.
    pub const WHITE: Self = Self(0);
    /// Colormap entry 1.
    pub const BLUE: Self = Self(1);
    /// Colormap entry 2.
    pub const RED: Self = Self(2);
    /// Colormap entry 3.
    pub const GREEN: Self = Self(3);
    /// Colormap entry 4.
    pub const YELLOW: Self = Self(4);
    /// Last entry of the base colormap.
    pub const BLACK: Self = Self(31);
}

/// Integer drawing coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Views a polyline as interleaved `x, y` coordinates, the layout the
    /// drawing backends take.
    #[inline]
    #[must_use]
    pub fn as_coordinates(points: &[Self]) -> &[i32] {
        bytemuck::cast_slice(points)
    }
}

/// Outline of a node box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// Rectangle.
    #[default]
    Box,
    /// Diamond.
    Rhomb,
    /// Ellipse.
    Ellipse,
    /// Upward triangle.
    Triangle,
}

/// Horizontal alignment of node text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextMode {
    /// Centered.
    #[default]
    Center,
    /// Flush left.
    LeftJustify,
    /// Flush right.
    RightJustify,
}

/// Stroke pattern of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Dotted line.
    Dotted,
    /// Dashed line.
    Dashed,
    /// Not drawn, still laid out.
    Invisible,
}

/// Arrowhead drawing style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ArrowStyle {
    /// Filled triangle.
    #[default]
    Solid,
    /// Two strokes.
    Line,
    /// No arrowhead.
    None,
}

/// Arrowhead at one end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Arrow {
    /// Drawing style.
    pub style: ArrowStyle,
    /// Length in pixels.
    pub size: i32,
    /// Fill color.
    pub color: Color,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            style: ArrowStyle::Solid,
            size: 10,
            color: Color::BLACK,
        }
    }
}

impl Arrow {
    /// An end without arrowhead.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            style: ArrowStyle::None,
            size: 0,
            color: Color::BLACK,
        }
    }
}

/// Display attributes of a node, also used as the per-scope default node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttributes {
    /// Unique display title, the title index key.
    pub title: Option<Text>,
    /// Text drawn inside the box. Falls back to the title when absent.
    pub label: Option<Text>,
    /// Free-text info fields shown on request.
    pub info: [Option<Text>; 3],
    /// Outline shape.
    pub shape: NodeShape,
    /// Box width, 0 means derived from the label.
    pub width: i32,
    /// Box height, 0 means derived from the label.
    pub height: i32,
    /// Fill color.
    pub color: Color,
    /// Text color.
    pub text_color: Color,
    /// Border color.
    pub border_color: Color,
    /// Text alignment.
    pub text_mode: TextMode,
    /// Border width in pixels.
    pub border_width: i32,
    /// Fold level, 0 when unfolded.
    pub fold_level: i32,
    /// Scale divisor.
    pub shrink: i32,
    /// Scale multiplier.
    pub stretch: i32,
    /// Explicit order within the level, if any.
    pub horizontal_order: Option<i32>,
}

impl Default for NodeAttributes {
    fn default() -> Self {
        Self {
            title: None,
            label: None,
            info: [None, None, None],
            shape: NodeShape::Box,
            width: 0,
            height: 0,
            color: Color::WHITE,
            text_color: Color::BLACK,
            border_color: Color::BLACK,
            text_mode: TextMode::Center,
            border_width: 2,
            fold_level: 0,
            shrink: 1,
            stretch: 1,
            horizontal_order: None,
        }
    }
}

impl NodeAttributes {
    /// Derives the default node of a nested scope.
    ///
    /// Everything is inherited except the identity fields: title, label
    /// and explicit horizontal order.
    #[must_use]
    pub fn inherit(&self) -> Self {
        Self {
            title: None,
            label: None,
            horizontal_order: None,
            ..self.clone()
        }
    }
}

/// Attribute set for a temporary node created during layout.
///
/// Unlike specification nodes, temporary nodes do not inherit from a scope;
/// the layout phase passes every value explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemporaryNodeConfig {
    /// Text alignment.
    pub text_mode: TextMode,
    /// Box width.
    pub width: i32,
    /// Box height.
    pub height: i32,
    /// Border width.
    pub border_width: i32,
    /// Whether the node stands in for a folded region.
    pub folded: bool,
    /// Fill color.
    pub color: Color,
    /// Text color.
    pub text_color: Color,
    /// Border color.
    pub border_color: Color,
    /// Scale divisor.
    pub shrink: i32,
    /// Scale multiplier.
    pub stretch: i32,
    /// Explicit order within the level, if any.
    pub horizontal_order: Option<i32>,
}

impl Default for TemporaryNodeConfig {
    fn default() -> Self {
        Self {
            text_mode: TextMode::Center,
            width: 0,
            height: 0,
            border_width: 0,
            folded: false,
            color: Color::WHITE,
            text_color: Color::BLACK,
            border_color: Color::BLACK,
            shrink: 1,
            stretch: 1,
            horizontal_order: None,
        }
    }
}

impl TemporaryNodeConfig {
    /// Converts the config into a full attribute set.
    #[must_use]
    pub fn to_attributes(&self) -> NodeAttributes {
        NodeAttributes {
            title: None,
            label: None,
            info: [None, None, None],
            shape: NodeShape::Box,
            width: self.width,
            height: self.height,
            color: self.color,
            text_color: self.text_color,
            border_color: self.border_color,
            text_mode: self.text_mode,
            border_width: self.border_width,
            fold_level: i32::from(self.folded),
            shrink: self.shrink,
            stretch: self.stretch,
            horizontal_order: self.horizontal_order,
        }
    }
}

/// Display attributes of an edge, also used as the per-scope default edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeAttributes {
    /// Stroke pattern.
    pub line_style: LineStyle,
    /// Stroke width in pixels.
    pub thickness: i32,
    /// Text drawn next to the edge.
    pub label: Option<Text>,
    /// Straightening priority.
    pub priority: i32,
    /// Arrowhead at the target end.
    pub head: Arrow,
    /// Arrowhead at the source end.
    pub tail: Arrow,
    /// Stroke color.
    pub color: Color,
}

impl Default for EdgeAttributes {
    fn default() -> Self {
        Self {
            line_style: LineStyle::Solid,
            thickness: 2,
            label: None,
            priority: 1,
            head: Arrow::default(),
            tail: Arrow::none(),
            color: Color::BLACK,
        }
    }
}

impl EdgeAttributes {
    /// Derives the default edge of a nested scope. Labels are not inherited.
    #[must_use]
    pub fn inherit(&self) -> Self {
        Self {
            label: None,
            ..self.clone()
        }
    }
}
