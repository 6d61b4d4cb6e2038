//! Normalized sprite record types.
//!
//! A [`NormalizedSpriteRecord`] is what the converter hands to the project
//! writer. Enum fields serialize to the integer codes used by the project
//! format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::{PlaybackSpeedType, SourceNineSlice};

/// Resource version written on sprite records.
pub const RESOURCE_VERSION: &str = "1.0";

/// Resource version written on frames.
pub const FRAME_RESOURCE_VERSION: &str = "1.1";

/// Texture group used when the lookup is disabled or finds nothing.
pub const DEFAULT_TEXTURE_GROUP: &str = "Default";

/// Synthetic texture group that collects sprites with missing textures.
pub const MISSING_TEXTURE_GROUP: &str = "MissingTextures";

/// Declares a fieldless enum that serializes as its `u8` code.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        $vis enum $name {
            $( $(#[$vmeta])* $variant = $code ),+
        }

        impl $name {
            /// Integer code used by the project format.
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Looks up a variant by its integer code.
            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $( c if c == $code => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = $crate::error::UnknownCode;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                Self::from_code(code).ok_or($crate::error::UnknownCode {
                    kind: stringify!($name),
                    code,
                })
            }
        }
    };
}

pub(crate) use coded_enum;

coded_enum! {
    /// How the bounding box is maintained by the editor.
    #[derive(Default)]
    pub enum BboxMode {
        #[default]
        Automatic = 0,
        FullImage = 1,
        Manual = 2,
    }
}

coded_enum! {
    /// Collision shape of a sprite.
    #[derive(Default)]
    pub enum CollisionKind {
        /// Exact pixel mask shared by all frames.
        Precise = 0,
        /// Bounding box.
        #[default]
        Rectangle = 1,
        /// Ellipse inscribed in the bounding box.
        Ellipse = 2,
        /// Diamond inscribed in the bounding box.
        Diamond = 3,
        /// Exact pixel mask per frame.
        PrecisePerFrame = 4,
        /// Rectangle that rotates with the instance.
        RotatedRectangle = 5,
    }
}

coded_enum! {
    /// Sprite content type.
    #[derive(Default)]
    pub enum SpriteType {
        #[default]
        Bitmap = 0,
        Swf = 1,
        Spine = 2,
    }
}

coded_enum! {
    /// Symbolic origin on a 3x3 grid, row-major, or `Custom`.
    #[derive(Default)]
    pub enum Origin {
        #[default]
        TopLeft = 0,
        TopCentre = 1,
        TopRight = 2,
        MiddleLeft = 3,
        MiddleCentre = 4,
        MiddleRight = 5,
        BottomLeft = 6,
        BottomCentre = 7,
        BottomRight = 8,
        Custom = 9,
    }
}

impl Origin {
    /// Combines a column (0..3) and a row (0..3) into a grid origin.
    ///
    /// Returns `Custom` when either index is out of range.
    pub fn from_grid(column: u8, row: u8) -> Self {
        if column > 2 || row > 2 {
            return Origin::Custom;
        }
        Self::from_code(row * 3 + column).unwrap_or(Origin::Custom)
    }
}

coded_enum! {
    /// Sequence playback mode.
    #[derive(Default)]
    pub enum Playback {
        Once = 0,
        #[default]
        Looped = 1,
        PingPong = 2,
    }
}

coded_enum! {
    /// Image layer blend mode.
    #[derive(Default)]
    pub enum LayerBlendMode {
        #[default]
        Normal = 0,
        Add = 1,
        Subtract = 2,
        Multiply = 3,
    }
}

coded_enum! {
    /// Nine-slice guide highlight style.
    #[derive(Default)]
    pub enum HighlightStyle {
        #[default]
        Inverted = 0,
        Overlay = 1,
    }
}

coded_enum! {
    /// Nine-slice tiling mode for one slice.
    #[derive(Default)]
    pub enum TileMode {
        #[default]
        Stretch = 0,
        Repeat = 1,
        Mirror = 2,
        BlankRepeat = 3,
        Hide = 4,
    }
}

/// A named reference to another project resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPath {
    pub name: String,
    pub path: String,
}

impl IdPath {
    /// Creates a reference from a name and an explicit path.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Reference to a resource file: `<prefix><name>/<name>.yy`.
    pub fn resource(name: &str, prefix: &str) -> Self {
        Self::new(name, format!("{prefix}{name}/{name}.yy"))
    }

    /// Reference to a folder: `<prefix><name>.yy`.
    pub fn folder(name: &str, prefix: &str) -> Self {
        Self::new(name, format!("{prefix}{name}.yy"))
    }

    /// Reference to a texture group.
    pub fn texture_group(name: &str) -> Self {
        Self::new(name, format!("texturegroups/{name}"))
    }
}

/// One animation frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteFrame {
    /// Frame GUID.
    pub name: String,
    pub resource_version: String,
}

impl SpriteFrame {
    /// Creates a frame with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            name: id.into(),
            resource_version: FRAME_RESOURCE_VERSION.to_string(),
        }
    }
}

/// Channel payload of a sprite keyframe: which frame to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpriteFrameKeyframe {
    pub id: IdPath,
}

/// A keyframe binding a frame to a time position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteKeyframe {
    /// Keyframe GUID.
    pub id: String,
    /// Time position, equal to the frame index.
    #[serde(rename = "Key")]
    pub key: u32,
    #[serde(rename = "Length")]
    pub length: f32,
    #[serde(rename = "Stretch")]
    pub stretch: bool,
    #[serde(rename = "Disabled")]
    pub disabled: bool,
    #[serde(rename = "IsCreationKey")]
    pub is_creation_key: bool,
    /// Channel name to payload; sprite tracks use the single channel `"0"`.
    #[serde(rename = "Channels")]
    pub channels: BTreeMap<String, SpriteFrameKeyframe>,
}

impl SpriteKeyframe {
    /// Creates a one-unit keyframe showing `frame` at time `key`.
    pub fn new(id: impl Into<String>, key: u32, frame: IdPath) -> Self {
        let mut channels = BTreeMap::new();
        channels.insert("0".to_string(), SpriteFrameKeyframe { id: frame });
        Self {
            id: id.into(),
            key,
            length: 1.0,
            stretch: false,
            disabled: false,
            is_creation_key: false,
            channels,
        }
    }

    /// The frame shown by this keyframe.
    pub fn frame(&self) -> Option<&IdPath> {
        self.channels.get("0").map(|c| &c.id)
    }
}

/// The sprite frames track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FramesTrack {
    pub name: String,
    pub keyframes: Vec<SpriteKeyframe>,
}

impl Default for FramesTrack {
    fn default() -> Self {
        Self {
            name: "frames".to_string(),
            keyframes: Vec::new(),
        }
    }
}

/// Playback sequence of a sprite; owns exactly one frames track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequence {
    pub name: String,
    pub playback: Playback,
    pub playback_speed: f32,
    pub playback_speed_type: PlaybackSpeedType,
    /// Length in frames.
    pub length: f32,
    pub xorigin: i32,
    pub yorigin: i32,
    pub track: FramesTrack,
}

impl Sequence {
    /// Creates an empty looped sequence at 30 frames per second.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            playback: Playback::Looped,
            playback_speed: 30.0,
            playback_speed_type: PlaybackSpeedType::FramesPerSecond,
            length: 0.0,
            xorigin: 0,
            yorigin: 0,
            track: FramesTrack::default(),
        }
    }
}

/// An image layer of the sprite editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    /// Layer GUID.
    pub name: String,
    pub visible: bool,
    pub is_locked: bool,
    pub blend_mode: LayerBlendMode,
    pub opacity: f32,
    pub display_name: String,
}

impl ImageLayer {
    /// Creates the visible "default" layer.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            name: id.into(),
            visible: true,
            is_locked: false,
            blend_mode: LayerBlendMode::Normal,
            opacity: 100.0,
            display_name: "default".to_string(),
        }
    }
}

const DEFAULT_GUIDE_COLOUR: u32 = 4294902015;
const DEFAULT_HIGHLIGHT_COLOUR: u32 = 1728023040;

/// Nine-slice scaling data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NineSliceData {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub guide_colour: [u32; 4],
    pub highlight_colour: u32,
    pub highlight_style: HighlightStyle,
    pub enabled: bool,
    pub tile_mode: [TileMode; 5],
}

impl From<&SourceNineSlice> for NineSliceData {
    fn from(source: &SourceNineSlice) -> Self {
        Self {
            left: source.left,
            top: source.top,
            right: source.right,
            bottom: source.bottom,
            guide_colour: [DEFAULT_GUIDE_COLOUR; 4],
            highlight_colour: DEFAULT_HIGHLIGHT_COLOUR,
            highlight_style: HighlightStyle::Inverted,
            enabled: source.enabled,
            // Unknown codes fall back to stretching.
            tile_mode: source
                .tile_modes
                .map(|code| TileMode::from_code(code).unwrap_or_default()),
        }
    }
}

/// The normalized sprite resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSpriteRecord {
    pub name: String,
    pub resource_version: String,
    /// Folder the sprite is filed under.
    pub parent: IdPath,

    pub bbox_mode: BboxMode,
    pub collision_kind: CollisionKind,
    #[serde(rename = "type")]
    pub sprite_type: SpriteType,
    pub origin: Origin,
    pub pre_multiply_alpha: bool,
    pub edge_filtering: bool,
    /// 0 to 255, used by precise collision kinds.
    pub collision_tolerance: u8,
    pub swf_precision: f32,

    #[serde(rename = "bbox_left")]
    pub bbox_left: i32,
    #[serde(rename = "bbox_right")]
    pub bbox_right: i32,
    #[serde(rename = "bbox_top")]
    pub bbox_top: i32,
    #[serde(rename = "bbox_bottom")]
    pub bbox_bottom: i32,

    #[serde(rename = "HTile")]
    pub h_tile: bool,
    #[serde(rename = "VTile")]
    pub v_tile: bool,
    #[serde(rename = "For3D")]
    pub for_3d: bool,
    #[serde(rename = "DynamicTexturePage")]
    pub dynamic_texture_page: bool,

    pub width: u32,
    pub height: u32,
    pub texture_group_id: IdPath,
    pub swatch_colours: Option<Vec<u32>>,
    pub grid_x: u32,
    pub grid_y: u32,

    pub frames: Vec<SpriteFrame>,
    pub sequence: Sequence,
    pub layers: Vec<ImageLayer>,
    pub nine_slice: Option<NineSliceData>,
}

impl NormalizedSpriteRecord {
    /// Creates a record with project defaults and no frames.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        let name = name.into();
        Self {
            sequence: Sequence::new(name.clone()),
            name,
            resource_version: RESOURCE_VERSION.to_string(),
            parent: IdPath::folder("Sprites", "folders/"),
            bbox_mode: BboxMode::Automatic,
            collision_kind: CollisionKind::Rectangle,
            sprite_type: SpriteType::Bitmap,
            origin: Origin::TopLeft,
            pre_multiply_alpha: false,
            edge_filtering: false,
            collision_tolerance: 0,
            swf_precision: 2.525,
            bbox_left: 0,
            bbox_right: 0,
            bbox_top: 0,
            bbox_bottom: 0,
            h_tile: false,
            v_tile: false,
            for_3d: false,
            dynamic_texture_page: false,
            width,
            height,
            texture_group_id: IdPath::texture_group(DEFAULT_TEXTURE_GROUP),
            swatch_colours: None,
            grid_x: 0,
            grid_y: 0,
            frames: Vec::new(),
            layers: Vec::new(),
            nine_slice: None,
        }
    }

    /// Path of the record file relative to the project root.
    pub fn resource_path(&self) -> String {
        format!("sprites/{0}/{0}.yy", self.name)
    }
}
