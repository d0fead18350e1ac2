//! The render cache: decoded textures per [`image::Image`], renderings derived from them and the
//! bookkeeping that allows swapping a texture while the game keeps using the same image.
//!
//! Images are deduplicated by path through the [`resolver::Resolver`], so whoever asks for a path
//! gets the instance that is already displayed. The [`image_cache::ImageCache`] only holds weak
//! references to images and keys everything by [`image::ImageId`], which is what reload requests
//! carry around. That way, an image that is dropped while its download is still in flight simply
//! isn't found anymore when the download completes.
pub mod derived_cache;
pub mod image;
pub mod image_cache;
pub mod render_cache;
pub mod resolver;
pub mod texture;
