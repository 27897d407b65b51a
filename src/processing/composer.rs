//! Multi-image PDF composition.
//!
//! Each input becomes one page sized to the image at the configured
//! resolution, in input order. The document is assembled with `lopdf` in
//! memory and written through a temporary file that is renamed into place
//! only once everything succeeded.

use std::io::Write;
use std::path::{Path, PathBuf};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info};

use crate::core::{DocumentConfig, DocumentRequest, PageEncoding, ProgressReporter};
use crate::utils::{CompressorError, CompressorResult, extract_filename, validate_document_request, write_atomically};
use super::codec::{SourceImage, encode_jpeg};

const PDF_VERSION: &str = "1.5";
const POINTS_PER_INCH: f64 = 72.0;
const IMAGE_RESOURCE: &str = "Im0";

/// Composes `sources` into one PDF at `destination` with default settings.
pub fn images_to_document<I, P>(
    sources: I,
    destination: impl Into<PathBuf>,
    on_progress: Option<&mut dyn FnMut(u8)>,
) -> CompressorResult<()>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let request = DocumentRequest::with_sources(destination, sources);
    DocumentComposer::default().compose(&request, on_progress)
}

#[derive(Debug, Clone, Default)]
pub struct DocumentComposer {
    config: DocumentConfig,
}

impl DocumentComposer {
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Decodes every source in order, then writes them as pages of one PDF.
    ///
    /// Progress: 0-50 while decoding, 90 once the temporary file is written,
    /// 100 after it replaces the destination. The first unreadable image
    /// aborts the whole document.
    pub fn compose(
        &self,
        request: &DocumentRequest,
        on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> CompressorResult<()> {
        self.config.validate()?;
        validate_document_request(request)?;

        let mut progress = ProgressReporter::new(on_progress);
        let total = request.len();

        let mut pages = Vec::with_capacity(total);
        for (idx, path) in request.sources().iter().enumerate() {
            let image = SourceImage::open(path)?.into_rgb();
            pages.push(image);
            progress.loaded(idx + 1, total);
        }

        let mut document = self.build_document(&pages)?;
        drop(pages);

        let destination = request.destination();
        write_atomically(
            destination,
            |writer| {
                document
                    .save_to(writer)
                    .map_err(|e| CompressorError::encode(format!("PDF save failed: {e}")))
            },
            || progress.encoded(),
        )?;
        progress.complete();

        info!(
            "Wrote {} page(s) to '{}'",
            total,
            extract_filename(destination)
        );
        Ok(())
    }

    /// Builds the page tree: one page per image, in slice order.
    fn build_document(&self, pages: &[DynamicImage]) -> CompressorResult<Document> {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for (idx, image) in pages.iter().enumerate() {
            let page_id = self.add_page(&mut doc, pages_id, image)?;
            debug!("Page {} → object {:?}", idx + 1, page_id);
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }

    fn add_page(&self, doc: &mut Document, parent: ObjectId, image: &DynamicImage) -> CompressorResult<ObjectId> {
        let (width_px, height_px) = (image.width(), image.height());
        let width_pt = width_px as f64 * POINTS_PER_INCH / self.config.resolution;
        let height_pt = height_px as f64 * POINTS_PER_INCH / self.config.resolution;

        let (filter, data) = self.encode_page_image(image)?;
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width_px as i64,
                "Height" => height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => filter,
            },
            data,
        ));

        // Scale the unit-square image to fill the page.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (width_pt as f32).into(),
                        0.into(),
                        0.into(),
                        (height_pt as f32).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => parent,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (width_pt as f32).into(),
                (height_pt as f32).into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_RESOURCE => image_id,
                },
            },
        });
        Ok(page_id)
    }

    /// Returns the stream filter name and the encoded pixel data.
    fn encode_page_image(&self, image: &DynamicImage) -> CompressorResult<(&'static str, Vec<u8>)> {
        match self.config.page_encoding {
            PageEncoding::Jpeg => Ok(("DCTDecode", encode_jpeg(image, self.config.jpeg_quality)?)),
            PageEncoding::Flate => {
                let rgb = image.to_rgb8();
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(rgb.as_raw())?;
                Ok(("FlateDecode", encoder.finish()?))
            }
        }
    }
}

/// Checks `path` parses as a PDF and returns its page count.
pub fn count_pages(path: &Path) -> CompressorResult<usize> {
    let doc = Document::load(path)
        .map_err(|e| CompressorError::decode(path, e))?;
    Ok(doc.get_pages().len())
}
