use actix_files::NamedFile;
use actix_web::web;
use std::path::Path;

use crate::appdata::AppData;

/// The article submission form. Everything else under the public directory is
/// served by the static files service.
pub async fn new_article(data: web::Data<AppData>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(
        Path::new(&data.cfg.public_dir).join("new.html"),
    )?)
}
