use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::detection::Detector;
use crate::models::SourceImage;
use crate::session::Session;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

impl DebugConfig {
    /// Save one stage image as `<NN>_<stage>/01.png`.
    fn save_stage(&self, index: usize, stage: &str, image: &RgbaImage) -> Result<()> {
        let stage_dir_name = format!("{:02}_{}", index, stage.to_lowercase().replace(' ', "_"));
        let stage_dir = self.output_dir.join(&stage_dir_name);
        std::fs::create_dir_all(&stage_dir)?;

        let output_path = stage_dir.join("01.png");
        image
            .save(&output_path)
            .with_context(|| format!("failed to save debug image {}", output_path.display()))?;
        debug!(path = %output_path.display(), "saved debug image");
        Ok(())
    }
}

/// One-shot select → detect → render run over a session.
pub struct Pipeline<D: Detector> {
    session: Session<D>,
    verbose: bool,
    debug: Option<DebugConfig>,
}

impl<D: Detector> Pipeline<D> {
    pub fn new(session: Session<D>) -> Self {
        Self {
            session,
            verbose: false,
            debug: None,
        }
    }

    /// Log each stage at info level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                anyhow::bail!("Debug directory is not empty: {}", output_dir.display());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn session(&self) -> &Session<D> {
        &self.session
    }

    fn stage(&self, message: &str) {
        if self.verbose {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }

    /// Run the whole flow on one image and return the annotated canvas.
    ///
    /// A detector that does not run yields the plain display image.
    pub fn run(&mut self, source: SourceImage, use_acceleration: bool) -> Result<RgbaImage> {
        self.stage("Normalizing image");
        let selection = self.session.select_image(source)?;
        if let Some(debug) = &self.debug {
            debug.save_stage(0, "source", &selection.display.pixels)?;
            let normalized = image::DynamicImage::ImageRgb8(selection.normalized.pixels.clone()).to_rgba8();
            debug.save_stage(1, "normalized", &normalized)?;
        }

        self.stage("Running detector");
        let count = self.session.detect(use_acceleration)?.map(<[_]>::len);
        match count {
            Some(count) => self.stage(&format!("  → {count} detections")),
            None => self.stage("  → detector did not run"),
        }

        self.stage("Rendering overlay");
        let annotated = self.session.render()?.into_owned();
        if let Some(debug) = &self.debug {
            debug.save_stage(2, "annotated", &annotated)?;
        }
        Ok(annotated)
    }

    /// Run on a file and write the annotated image to `output`.
    pub fn run_file(&mut self, input: &Path, output: &Path, use_acceleration: bool) -> Result<()> {
        let source = SourceImage::from_file(input)
            .with_context(|| format!("failed to read image {}", input.display()))?;
        let annotated = self.run(source, use_acceleration)?;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        annotated
            .save(output)
            .with_context(|| format!("failed to save annotated image {}", output.display()))?;
        info!(path = %output.display(), "wrote annotated image");
        Ok(())
    }
}
