//! Batch generation of an icon set from one source and many profiles.
//!
//! Each profile depends only on the immutable source, so profiles are
//! rendered independently (in parallel by default) and collected back in
//! input order. A failing profile is recorded and the batch moves on.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::codec;
use crate::color::Background;
use crate::error::{Error, RenderError, ValidationError};
use crate::icon::{GeneratedIcon, IconSet};
use crate::options::RenderOptions;
use crate::profile::Profile;
use crate::render;
use crate::source::SourceImage;

// ============================================================================
// CancelToken
// ============================================================================

/// Shared flag used to stop a running batch.
///
/// Clones observe the same flag. Profiles already being rendered finish;
/// the ones not yet started are skipped.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Batch results
// ============================================================================

/// A profile that produced no icon.
#[derive(Debug)]
pub struct ProfileFailure {
    /// Position of the profile in the request.
    pub index: usize,
    pub name: String,
    pub error: RenderError,
}

impl fmt::Display for ProfileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile #{} '{}': {}", self.index, self.name, self.error)
    }
}

/// Icons and per-profile failures of one run.
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub icons: IconSet,
    pub failures: Vec<ProfileFailure>,
}

impl BatchOutput {
    /// Returns true if every profile produced an icon.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// IconGenerator
// ============================================================================

/// Renders and encodes one icon per profile.
///
/// ```
/// use iconset_renderer::{CancelToken, IconGenerator, Profile, RenderOptions, SourceImage};
/// use image::{Rgba, RgbaImage};
///
/// let source = SourceImage::from(RgbaImage::from_pixel(64, 64, Rgba([200, 30, 30, 255])));
/// let profiles = [Profile::new("icon-32", 32, 32), Profile::new("icon-16", 16, 16)];
///
/// let generator = IconGenerator::new(RenderOptions::new().with_padding(0.2));
/// let output = generator.run(&source, &profiles, &CancelToken::new()).unwrap();
/// assert_eq!(output.icons.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IconGenerator {
    options: RenderOptions,
}

impl IconGenerator {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Generates one icon per profile, in profile order.
    ///
    /// Request-level problems fail before any profile is touched. If no
    /// profile succeeds the failures are returned in
    /// [`Error::NothingGenerated`].
    pub fn run(
        &self,
        source: &SourceImage,
        profiles: &[Profile],
        cancel: &CancelToken,
    ) -> Result<BatchOutput, Error> {
        self.options.validate()?;
        if profiles.is_empty() {
            return Err(ValidationError::NoProfiles.into());
        }

        let started = Instant::now();
        let background = self
            .options
            .background_mode
            .resolve(self.options.background, source.as_raster());
        let matte = background
            .filter(|bg| bg.a > 0)
            .unwrap_or(Background::WHITE);

        tracing::debug!(
            profiles = profiles.len(),
            vector = source.is_vector(),
            parallel = self.options.parallel,
            background = ?background,
            "Starting icon generation"
        );

        type Outcome = Option<Result<GeneratedIcon, ProfileFailure>>;
        let job = |(index, profile): (usize, &Profile)| -> Outcome {
            if cancel.is_cancelled() {
                return None;
            }
            Some(
                self.generate_one(source, profile, background, matte)
                    .map_err(|error| ProfileFailure {
                        index,
                        name: profile.name.clone(),
                        error,
                    }),
            )
        };

        let outcomes: Vec<_> = if self.options.parallel {
            profiles.par_iter().enumerate().map(job).collect()
        } else {
            profiles.iter().enumerate().map(job).collect()
        };

        if cancel.is_cancelled() {
            tracing::info!("Icon generation cancelled");
            return Err(Error::Cancelled);
        }

        let mut output = BatchOutput::default();
        for outcome in outcomes.into_iter().flatten() {
            match outcome {
                Ok(icon) => output.icons.push(icon),
                Err(failure) => {
                    tracing::warn!(
                        index = failure.index,
                        profile = %failure.name,
                        error = %failure.error,
                        "Profile failed"
                    );
                    output.failures.push(failure);
                }
            }
        }

        tracing::info!(
            generated = output.icons.len(),
            failed = output.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Icon generation finished"
        );

        if output.icons.is_empty() {
            return Err(Error::NothingGenerated {
                failures: output.failures,
            });
        }
        Ok(output)
    }

    fn generate_one(
        &self,
        source: &SourceImage,
        profile: &Profile,
        background: Option<Background>,
        matte: Background,
    ) -> Result<GeneratedIcon, RenderError> {
        let padding = profile.effective_padding(self.options.padding)?;
        tracing::debug!(
            profile = %profile.name,
            size = %profile.size_label(),
            format = %profile.format,
            padding,
            "Rendering profile"
        );

        let bitmap = render::render(source, profile.size(), padding, background)?;
        let bytes = codec::encode(&bitmap, profile.format, matte)?;
        Ok(GeneratedIcon::new(profile, bytes))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BackgroundMode;
    use crate::error::{GeometryError, VectorError};
    use crate::profile::ImageFormat;
    use image::{Rgba, RgbaImage};

    fn raster_source() -> SourceImage {
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([20, 120, 220, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        SourceImage::from(img)
    }

    fn three_profiles() -> Vec<Profile> {
        vec![
            Profile::new("first", 32, 32).with_folder("web/"),
            Profile::new("broken", 0, 0).with_folder("web/"),
            Profile::new("third", 48, 24)
                .with_folder("web/")
                .with_format(ImageFormat::Jpeg),
        ]
    }

    #[test]
    fn failing_profile_does_not_abort_batch() {
        let generator = IconGenerator::new(RenderOptions::new().with_parallel(false));
        let output = generator
            .run(&raster_source(), &three_profiles(), &CancelToken::new())
            .unwrap();

        let paths: Vec<_> = output.icons.iter().map(GeneratedIcon::relative_path).collect();
        assert_eq!(paths, ["web/first.png", "web/third.jpeg"]);

        assert_eq!(output.failures.len(), 1);
        let failure = &output.failures[0];
        assert_eq!(failure.index, 1);
        assert_eq!(failure.name, "broken");
        assert!(matches!(
            failure.error,
            RenderError::Geometry(GeometryError::ViewingAreaTooSmall { .. })
        ));
        assert!(!output.is_complete());
    }

    #[test]
    fn output_dimensions_match_profiles() {
        let output = IconGenerator::default()
            .run(&raster_source(), &three_profiles(), &CancelToken::new())
            .unwrap();

        for icon in output.icons.iter() {
            let decoded = codec::decode(icon.bytes()).unwrap();
            assert_eq!(decoded.dimensions(), (icon.size().width, icon.size().height));
        }
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let source = raster_source();
        let profiles = three_profiles();
        let cancel = CancelToken::new();

        let parallel = IconGenerator::new(RenderOptions::new().with_padding(0.3))
            .run(&source, &profiles, &cancel)
            .unwrap();
        let sequential_options = RenderOptions::new().with_padding(0.3).with_parallel(false);
        let sequential = IconGenerator::new(sequential_options)
            .run(&source, &profiles, &cancel)
            .unwrap();
        assert_eq!(parallel.icons, sequential.icons);
    }

    #[test]
    fn unsized_vector_fails_every_profile() {
        let source = SourceImage::from_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><circle cx="5" cy="5" r="5"/></svg>"#,
        )
        .unwrap();
        let profiles = [Profile::new("a", 16, 16), Profile::new("b", 32, 32)];

        match IconGenerator::default().run(&source, &profiles, &CancelToken::new()) {
            Err(Error::NothingGenerated { failures }) => {
                assert_eq!(failures.len(), 2);
                assert!(failures.iter().all(|f| matches!(
                    f.error,
                    RenderError::Vector(VectorError::NoIntrinsicSize)
                )));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_profile_list_is_rejected() {
        let result = IconGenerator::default().run(&raster_source(), &[], &CancelToken::new());
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::NoProfiles))
        ));
    }

    #[test]
    fn invalid_request_padding_is_rejected() {
        let generator = IconGenerator::new(RenderOptions::new().with_padding(-0.1));
        let result = generator.run(&raster_source(), &three_profiles(), &CancelToken::new());
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::PaddingOutOfRange { field: "padding", .. }))
        ));
    }

    #[test]
    fn oversized_profile_fails_only_that_profile() {
        let profiles = [
            Profile::new("ok", 16, 16),
            Profile::new("huge", u32::MAX, u32::MAX),
        ];
        let output = IconGenerator::default()
            .run(&raster_source(), &profiles, &CancelToken::new())
            .unwrap();

        assert_eq!(output.icons.len(), 1);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].name, "huge");
        assert!(matches!(
            output.failures[0].error,
            RenderError::Geometry(GeometryError::CanvasTooLarge { .. })
        ));
    }

    #[test]
    fn invalid_profile_padding_fails_only_that_profile() {
        let profiles = [
            Profile::new("ok", 16, 16),
            Profile::new("bad", 16, 16).with_padding(2.0),
        ];
        let output = IconGenerator::default()
            .run(&raster_source(), &profiles, &CancelToken::new())
            .unwrap();
        assert_eq!(output.icons.len(), 1);
        assert!(matches!(
            output.failures[0].error,
            RenderError::Validation(ValidationError::PaddingOutOfRange {
                field: "profile.padding",
                ..
            })
        ));
    }

    #[test]
    fn cancelled_run_returns_cancelled() {
        let cancel = CancelToken::new();
        cancel.clone().cancel();
        assert!(cancel.is_cancelled());

        let result = IconGenerator::default().run(&raster_source(), &three_profiles(), &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn sampled_corner_fills_padding() {
        let options = RenderOptions::new()
            .with_padding(0.5)
            .with_background_mode(BackgroundMode::SampleCorner);
        let output = IconGenerator::new(options)
            .run(&raster_source(), &[Profile::new("a", 32, 32)], &CancelToken::new())
            .unwrap();

        let decoded = codec::decode(output.icons.icons[0].bytes()).unwrap();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn failure_display_names_profile() {
        let failure = ProfileFailure {
            index: 2,
            name: "splash".into(),
            error: GeometryError::EmptySource.into(),
        };
        assert_eq!(
            failure.to_string(),
            "profile #2 'splash': source image has no pixels"
        );
    }
}
