//! Uploaded document checks shared by the catalog and invoice services

use uuid::Uuid;

use crate::error::AppError;

/// Upload size limit for PDFs
pub const MAX_PDF_BYTES: usize = 10 * 1024 * 1024;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// An uploaded file as received from a multipart form
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Accept only PDFs: declared `application/pdf` and a `%PDF-` header
pub fn validate_pdf(field: &str, upload: &Upload) -> Result<(), AppError> {
    let declared_pdf = upload
        .content_type
        .as_deref()
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"));

    if !declared_pdf || !upload.bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::invalid(field, format!("The {} must be a file of type: pdf.", field)));
    }
    if upload.bytes.len() > MAX_PDF_BYTES {
        return Err(AppError::invalid(
            field,
            format!("The {} may not be greater than 10240 kilobytes.", field),
        ));
    }
    Ok(())
}

/// Fresh storage name for an uploaded PDF
pub fn pdf_file_name() -> String {
    format!("{}.pdf", Uuid::new_v4())
}
