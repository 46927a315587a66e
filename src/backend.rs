use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lopdf::{Document, Object, ObjectId, Reader};
use tracing::debug;

use crate::error::BackendError;

/// Trait for PDF parsing backends.
///
/// The extractor only needs to open a document, ask whether it is still
/// locked, count pages and pull plain text per page. Everything else about
/// the file format stays inside the implementor.
pub trait PdfBackend {
    type Document: PdfDocument;

    /// Open `path`, decrypting with `password` when one is given.
    ///
    /// Returning [`BackendError::PasswordRequired`] tells the caller the file
    /// could not even be loaded without a password.
    fn open(&self, path: &Path, password: Option<&str>) -> Result<Self::Document, BackendError>;
}

/// An opened document. Dropping it releases the underlying handle.
pub trait PdfDocument {
    /// True while the content streams are still encrypted.
    fn is_encrypted(&self) -> bool;

    fn page_count(&self) -> usize;

    /// Plain text of the page at zero-based `index`.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;
}

/// [`PdfBackend`] backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

pub struct LopdfDocument {
    doc: Document,
    page_numbers: Vec<u32>,
    locked: bool,
}

// Same byte length as the keys they stand in for, so xref offsets stay valid.
const ENCRYPT_KEY: &[u8] = b"/Encrypt";
const HIDDEN_ENCRYPT_KEY: &[u8] = b"/Xncrypt";
const HIDDEN_OBJSTM_TYPE: &[u8] = b"XObjStm";

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;

    fn open(&self, path: &Path, password: Option<&str>) -> Result<LopdfDocument, BackendError> {
        debug!("opening {:?}", path);

        let bytes = fs::read(path).map_err(|e| BackendError::Open(e.to_string()))?;
        let doc = match Document::load_mem(&bytes) {
            Ok(doc) => doc,
            Err(e) => {
                let msg = e.to_string();
                let lower = msg.to_lowercase();
                // lopdf can refuse to load an encrypted file outright
                if password.is_none() && (lower.contains("encrypt") || lower.contains("password"))
                {
                    return Err(BackendError::PasswordRequired);
                }
                return Err(BackendError::Open(msg));
            }
        };

        // lopdf decrypts owner-password-only files during load and records
        // the state; only files the empty password could not open stay locked.
        let locked = doc.is_encrypted() && doc.encryption_state.is_none();

        let (doc, locked) = match (locked, password) {
            (true, Some(password)) => (load_with_password(&bytes, password)?, false),
            (locked, _) => (doc, locked),
        };

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        Ok(LopdfDocument {
            doc,
            page_numbers,
            locked,
        })
    }
}

/// Load a user-password protected file and decrypt it with `password`.
///
/// When the empty password fails, lopdf's loader keeps only the `/Encrypt`
/// dictionary and skips parsing every other object. Hiding the trailer's
/// `/Encrypt` key makes it parse the file as plain objects instead, which
/// [`Document::decrypt`] can then work on once the key is put back.
fn load_with_password(bytes: &[u8], password: &str) -> Result<Document, BackendError> {
    let mut buffer = bytes.to_vec();
    let pos = find_trailer_encrypt_key(&buffer)
        .ok_or_else(|| BackendError::Open("encrypted trailer entry not found".to_string()))?;
    buffer[pos..pos + ENCRYPT_KEY.len()].copy_from_slice(HIDDEN_ENCRYPT_KEY);

    let mut doc = Reader {
        buffer: &buffer,
        document: Document::new(),
        encryption_state: None,
        raw_objects: BTreeMap::new(),
    }
    .read(Some(hide_object_stream))?;

    for object in doc.objects.values_mut() {
        if let Ok(stream) = object.as_stream_mut() {
            if stream.dict.has_type(HIDDEN_OBJSTM_TYPE) {
                stream.dict.set("Type", Object::Name(b"ObjStm".to_vec()));
            }
        }
    }

    let encrypt = doc
        .trailer
        .remove(&HIDDEN_ENCRYPT_KEY[1..])
        .ok_or_else(|| BackendError::Open("encrypted trailer entry not found".to_string()))?;
    doc.trailer.set("Encrypt", encrypt);

    doc.decrypt(password)?;
    Ok(doc)
}

/// Last `/Encrypt` key in the file that is not a prefix of a longer name.
fn find_trailer_encrypt_key(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(ENCRYPT_KEY.len() + 1)
        .rposition(|w| {
            w.starts_with(ENCRYPT_KEY)
                && !w[ENCRYPT_KEY.len()].is_ascii_alphanumeric()
                && w[ENCRYPT_KEY.len()] != b'_'
        })
}

// Encrypted object streams cannot be unpacked before decryption, and the
// plain loader drops any it fails to unpack.
fn hide_object_stream(id: ObjectId, object: &mut Object) -> Option<(ObjectId, Object)> {
    if let Ok(stream) = object.as_stream_mut() {
        if stream.dict.has_type(b"ObjStm") {
            stream.dict.set("Type", Object::Name(HIDDEN_OBJSTM_TYPE.to_vec()));
        }
    }
    Some((id, Object::Null))
}

impl PdfDocument for LopdfDocument {
    fn is_encrypted(&self) -> bool {
        self.locked
    }

    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page_num = *self
            .page_numbers
            .get(index)
            .ok_or_else(|| BackendError::Extract(format!("page index {} out of range", index)))?;

        debug!("extracting text from page {}", page_num);
        self.doc
            .extract_text(&[page_num])
            .map_err(|e| BackendError::Extract(e.to_string()))
    }
}

impl Drop for LopdfDocument {
    fn drop(&mut self) {
        debug!("closing document ({} pages)", self.page_numbers.len());
    }
}
