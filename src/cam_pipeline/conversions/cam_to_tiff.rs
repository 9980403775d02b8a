use tracing::{info, instrument};
use std::io::Write;
use std::path::Path;

use crate::cam_pipeline::{
    common::{error::{CamError, Result}, types::RgbImage},
    classifier::GapClassifier,
    engine::{CamEngine, CamOutput},
    overlay::{blend, denormalize, hstack},
    preprocess::to_tensor,
    tiff::{CamConfig, HeatmapWriter, ImageReader, PanelLayout, StandardTiffWriter, TiffImageReader},
};

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct CamReport {
    pub cam: CamOutput,
    /// Size of the image handed to the writer
    pub panel_width: usize,
    pub panel_height: usize,
}

pub struct CamPipeline<'m, M: GapClassifier + ?Sized, R: ImageReader, W: HeatmapWriter> {
    engine: CamEngine<'m, M>,
    reader: R,
    writer: W,
    config: CamConfig,
}

impl<'m, M: GapClassifier + ?Sized> CamPipeline<'m, M, TiffImageReader, StandardTiffWriter> {
    pub fn new(model: &'m M, config: CamConfig) -> Result<Self> {
        Self::with_custom(model, TiffImageReader, StandardTiffWriter, config)
    }
}

impl<'m, M: GapClassifier + ?Sized, R: ImageReader, W: HeatmapWriter> CamPipeline<'m, M, R, W> {
    pub fn with_custom(model: &'m M, reader: R, writer: W, config: CamConfig) -> Result<Self> {
        config.normalization.validate()?;
        let engine = CamEngine::new(model)?.with_epsilon(config.epsilon);
        Ok(Self {
            engine,
            reader,
            writer,
            config,
        })
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(CamError::InvalidDimensions(width, height));
        }

        Ok(())
    }

    fn compose(&self, input: &RgbImage, heatmap: &RgbImage) -> Result<RgbImage> {
        match self.config.layout {
            PanelLayout::HeatmapOnly => Ok(heatmap.clone()),
            PanelLayout::Overlay => blend(input, heatmap, self.config.alpha),
            PanelLayout::SideBySide => {
                let blended = blend(input, heatmap, self.config.alpha)?;
                hstack(&[input, heatmap, &blended])
            }
        }
    }

    #[instrument(skip(self, input_data, output), fields(input_size = input_data.len()))]
    pub fn convert(&mut self, input_data: &[u8], output: &mut dyn Write) -> Result<CamReport> {
        info!("Starting class activation map");

        let image = {
            let _span = tracing::info_span!("decode_input").entered();
            self.reader.read_image(input_data)?
        };

        {
            let _span = tracing::info_span!("validate_dimensions",
                width = image.width,
                height = image.height
            ).entered();
            self.validate_dimensions(image.width, image.height)?;
        }

        let tensor = {
            let _span = tracing::info_span!("preprocess").entered();
            to_tensor(&image, &self.config.normalization, self.config.image_size)?
        };

        let cam = {
            let _span = tracing::info_span!("compute_heatmap").entered();
            self.engine.compute_heatmap(tensor.view())?
        };

        let panel = {
            let _span = tracing::info_span!("compose").entered();
            let visible = denormalize(tensor.view(), &self.config.normalization)?;
            self.compose(&visible, &cam.heatmap)?
        };

        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_rgb(&panel, output, &self.config)?;
        }

        info!(
            width = cam.heatmap.width,
            height = cam.heatmap.height,
            predicted_class = cam.predicted_class,
            "Heatmap complete"
        );

        Ok(CamReport {
            panel_width: panel.width,
            panel_height: panel.height,
            cam,
        })
    }

    #[instrument(skip(self, input_path, output_path))]
    pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input_path: P,
        output_path: Q,
    ) -> Result<CamReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Processing file"
        );

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                CamError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let mut output_file = {
            let _span = tracing::info_span!("create_output_file").entered();
            std::fs::File::create(output_path).map_err(|e| {
                CamError::OutputWriteError(format!("{}: {}", output_path.display(), e))
            })?
        };

        self.convert(&input_data, &mut output_file)
    }

    pub fn config(&self) -> &CamConfig {
        &self.config
    }

    pub fn engine(&self) -> &CamEngine<'m, M> {
        &self.engine
    }
}
