use cam_heatmap_rs::cam_pipeline::{CamConfig, CamPipeline, PanelLayout, PointwiseGapNet, TiffCompression};
use cam_heatmap_rs::logger;

use ndarray::{arr1, arr2};
use tracing::{error, info};

/// Three colour-opponent feature channels feeding a red/green/blue classifier.
fn demo_classifier() -> cam_heatmap_rs::cam_pipeline::Result<PointwiseGapNet> {
    PointwiseGapNet::new(
        arr2(&[
            [2.0, -1.0, -1.0],
            [-1.0, 2.0, -1.0],
            [-1.0, -1.0, 2.0],
        ]),
        arr1(&[0.0, 0.0, 0.0]),
        arr2(&[
            [1.0, -0.25, -0.25],
            [-0.25, 1.0, -0.25],
            [-0.25, -0.25, 1.0],
        ]),
        arr1(&[0.0, 0.0, 0.0]),
        16,
    )
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting cam_heatmap...");

    let config = CamConfig::builder()
        .image_size(Some((256, 256)))
        .layout(PanelLayout::SideBySide)
        .alpha(0.5)
        .compression(TiffCompression::DeflateBalanced)
        .build();

    let model = demo_classifier()?;
    let mut pipeline = CamPipeline::new(&model, config)?;

    info!("CAM pipeline initialized");
    info!("Pooling anchor: {}", pipeline.engine().anchor());
    info!("Layout: {:?}", pipeline.config().layout);

    match pipeline.convert_file("input.tiff", "cam_output.tiff") {
        Ok(report) => info!(
            predicted_class = report.cam.predicted_class,
            "Heatmap written ({}x{})",
            report.panel_width,
            report.panel_height
        ),
        Err(e) => error!("CAM failed: {}", e),
    }

    Ok(())
}
