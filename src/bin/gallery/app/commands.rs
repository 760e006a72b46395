use std::path::Path;

use image_gallery::{
    client::{AlgorithmParams, Upload},
    gallery::ApplyOutcome,
    render::DisplayTarget,
    types::ImageId,
};

use super::Gallery;

pub(super) fn print_errors(gallery: &Gallery) {
    for message in gallery.errors().messages() {
        eprintln!("{message}");
    }
}

pub(super) fn failure(gallery: &Gallery, message: &str) -> anyhow::Error {
    print_errors(gallery);
    anyhow::anyhow!("{message}")
}

pub(super) fn print_editor_path(gallery: &Gallery) {
    if let Some(path) = gallery.renderer().path_of(DisplayTarget::Editor) {
        println!("Editor image written to {}", path.display());
    }
}

pub async fn list(gallery: &mut Gallery) -> anyhow::Result<()> {
    if gallery.refresh_list().await.is_none() {
        return Err(failure(gallery, "could not fetch the image list"));
    }
    for image in gallery.images() {
        println!(
            "{:>5}  {:<32} {:<12} {}",
            image.id,
            image.name,
            image.media_type.as_deref().unwrap_or("-"),
            image.size
        );
    }
    print_errors(gallery);
    Ok(())
}

pub async fn show(gallery: &mut Gallery, id: ImageId, params: Option<&str>) -> anyhow::Result<()> {
    let params = params.map(str::parse::<AlgorithmParams>).transpose()?;
    if gallery.refresh_list().await.is_none() || !gallery.select_image(id).await {
        return Err(failure(gallery, &format!("could not open image {id}")));
    }
    if let Some(params) = params {
        let outcome = gallery.apply_algorithm(params, false).await;
        if outcome != ApplyOutcome::Applied {
            return Err(failure(gallery, &format!("algorithm not applied ({outcome:?})")));
        }
    }
    print_editor_path(gallery);
    Ok(())
}

pub async fn upload(gallery: &mut Gallery, path: &Path, name: Option<String>) -> anyhow::Result<()> {
    let upload = Upload::from_path(path, name).await?;
    if !gallery.upload_image(upload).await {
        return Err(failure(gallery, &format!("could not upload {}", path.display())));
    }
    println!("Uploaded {} ({} images in gallery)", path.display(), gallery.images().len());
    Ok(())
}

pub async fn delete(gallery: &mut Gallery, id: ImageId) -> anyhow::Result<()> {
    if !gallery.delete_image(id).await {
        return Err(failure(gallery, &format!("could not delete image {id}")));
    }
    println!("Deleted image {id}");
    Ok(())
}
