/*!
 * Translation service for Markdown documents using AI providers.
 *
 * - `core`: the service sending one whole document per request
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;

// Submodules
pub mod core;
