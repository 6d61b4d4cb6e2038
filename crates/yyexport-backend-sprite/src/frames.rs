//! Frame and keyframe construction.
//!
//! Every frame gets a deterministic id derived from the sprite name and its
//! index, plus one keyframe at time `index` on the sequence's single
//! `frames` track.

use log::debug;
use yyexport_spec::{
    generate_id, FramesTrack, IdPath, SpriteFrame, SpriteKeyframe, TextureRef,
};

use crate::color::Color;
use crate::error::ConvertError;
use crate::metadata::BoundingBox;
use crate::placeholder::{missing_texture_placeholder, transparent_frame};
use crate::texture::{TextureBuffer, TextureResolver};

/// Sprite-wide facts every frame image depends on.
#[derive(Debug, Clone, Copy)]
pub struct FrameCanvas {
    pub width: u32,
    pub height: u32,
    pub bbox: BoundingBox,
    /// Draw the missing-texture checker instead of a blank frame.
    pub placeholder: bool,
}

/// The image of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    pub frame_id: String,
    pub image: TextureBuffer,
}

impl FrameImage {
    /// Path of the composite image, relative to the sprite directory.
    pub fn composite_path(&self) -> String {
        format!("{}.png", self.frame_id)
    }

    /// Path of the layer image, relative to the sprite directory.
    pub fn layer_path(&self, layer_id: &str) -> String {
        format!("layers/{}/{}.png", self.frame_id, layer_id)
    }
}

/// Output of [`FrameSequenceBuilder::finish`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    pub frames: Vec<SpriteFrame>,
    pub track: FramesTrack,
    pub images: Vec<FrameImage>,
}

/// Accumulates frames, keyframes and frame images for one sprite.
#[derive(Debug)]
pub struct FrameSequenceBuilder {
    sprite_name: String,
    resource: IdPath,
    frames: Vec<SpriteFrame>,
    track: Option<FramesTrack>,
    images: Vec<FrameImage>,
}

impl FrameSequenceBuilder {
    pub fn new(sprite_name: impl Into<String>) -> Self {
        let sprite_name = sprite_name.into();
        let resource = IdPath::resource(&sprite_name, "sprites/");
        Self {
            sprite_name,
            resource,
            frames: Vec::new(),
            track: None,
            images: Vec::new(),
        }
    }

    /// Build frame `index`. Frames must be built in ascending index order.
    ///
    /// A missing texture yields the placeholder (or a transparent image when
    /// placeholders are off). A texture that fails to resolve aborts the
    /// sprite.
    pub fn build_frame(
        &mut self,
        index: u32,
        texture: Option<&TextureRef>,
        resolver: &dyn TextureResolver,
        canvas: &FrameCanvas,
    ) -> Result<(SpriteFrame, SpriteKeyframe), ConvertError> {
        debug_assert_eq!(index as usize, self.frames.len());

        let frame_id = generate_id(&format!("{}.{}", self.sprite_name, index));
        let keyframe_id = generate_id(&format!("{}.{}k", self.sprite_name, index));

        let image = match texture {
            Some(texture) => {
                let image = resolver
                    .resolve(texture)
                    .map_err(|source| ConvertError::TextureAcquisition { index, source })?;
                fit_to_canvas(image, canvas)
            }
            None if canvas.placeholder => {
                debug!("{}: frame {} has no texture, using placeholder", self.sprite_name, index);
                missing_texture_placeholder(canvas.width, canvas.height, &canvas.bbox)
            }
            None => transparent_frame(canvas.width, canvas.height),
        };

        let frame = SpriteFrame::new(frame_id.clone());
        let keyframe = SpriteKeyframe::new(
            keyframe_id,
            index,
            IdPath::new(frame_id.clone(), self.resource.path.clone()),
        );

        self.frames.push(frame.clone());
        self.track
            .get_or_insert_with(FramesTrack::default)
            .keyframes
            .push(keyframe.clone());
        self.images.push(FrameImage { frame_id, image });

        Ok((frame, keyframe))
    }

    /// Finish the sequence. The frames track exists even with no frames.
    pub fn finish(self) -> FrameSequence {
        FrameSequence {
            frames: self.frames,
            track: self.track.unwrap_or_default(),
            images: self.images,
        }
    }
}

fn fit_to_canvas(image: TextureBuffer, canvas: &FrameCanvas) -> TextureBuffer {
    if image.width == canvas.width && image.height == canvas.height {
        return image;
    }
    debug!(
        "resizing frame canvas from {}x{} to {}x{}",
        image.width, image.height, canvas.width, canvas.height
    );
    image.extent(canvas.width, canvas.height, 0, 0, Color::transparent())
}
