#![allow(dead_code)]

use std::path::Path;

use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, StringFormat,
    dictionary,
};

/// Build a document with one Helvetica text line per page.
pub fn build_document(pages: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for text in pages {
        let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc
}

pub fn write_pdf(path: &Path, pages: &[&str]) {
    build_document(pages).save(path).unwrap();
}

/// Write an RC4 128-bit encrypted PDF. An empty `user_password` gives an
/// owner-only file that opens without a password.
pub fn write_encrypted_pdf(
    path: &Path,
    pages: &[&str],
    owner_password: &str,
    user_password: &str,
) {
    let mut doc = build_document(pages);

    // The key derivation needs a file identifier.
    let id1: Vec<u8> = (1..=16).collect();
    let id2: Vec<u8> = (1..=16).rev().collect();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id1, StringFormat::Literal),
            Object::String(id2, StringFormat::Literal),
        ]),
    );

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password,
        user_password,
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();

    doc.save(path).unwrap();
}
