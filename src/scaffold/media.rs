use super::{patch_optional, ScaffoldReport};
use crate::patch::PatchRule;
use crate::project::ProjectContext;
use crate::Result;

pub const MEDIA_URL: &str = "'/uploads/'";
pub const MEDIA_ROOT: &str = "BASE_DIR / 'uploads'";

const SETTINGS_IMPORT: &str = "from django.conf import settings";
const STATIC_IMPORT: &str = "from django.conf.urls.static import static";
const MEDIA_PATTERNS: &str =
    "\nif settings.DEBUG:\n    urlpatterns += static(settings.MEDIA_URL, document_root=settings.MEDIA_ROOT)";

pub fn media_settings_rules() -> Vec<PatchRule> {
    vec![
        PatchRule::setting("MEDIA_URL", MEDIA_URL),
        PatchRule::setting("MEDIA_ROOT", MEDIA_ROOT),
    ]
}

/// Rules serving uploaded files from the project urls while DEBUG is on
pub fn media_urls_rules() -> Vec<PatchRule> {
    vec![
        PatchRule::prepend(STATIC_IMPORT),
        PatchRule::prepend(SETTINGS_IMPORT),
        PatchRule::append(MEDIA_PATTERNS).unless_present("static(settings.MEDIA_URL"),
    ]
}

/// Configure MEDIA_URL / MEDIA_ROOT and the debug static route for uploads.
pub fn ensure_media_config(ctx: &ProjectContext) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::new();
    patch_optional(&mut report, ctx, &ctx.settings_path, &media_settings_rules())?;
    patch_optional(&mut report, ctx, &ctx.urls_path, &media_urls_rules())?;
    Ok(report)
}
