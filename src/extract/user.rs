//! User entry view: fans out into the per-user sub-views.

use crate::api::TimelineFetch;
use crate::config::Config;
use crate::error::Result;
use crate::extract::event::EventSink;
use crate::extract::info::run_info;
use crate::extract::media::ProfileImageKind;
use crate::extract::profile::run_profile_images;
use crate::extract::timeline::run_timeline;

/// Crawl a user through the enabled sub-views.
///
/// Sub-views run sequentially and at most once each; a failing sub-view is
/// logged and does not prevent the remaining ones from running. By default
/// only the timeline runs; info, avatar and background are opt-in.
pub async fn run_user(
    api: &dyn TimelineFetch,
    config: &Config,
    handle: &str,
    sink: &mut dyn EventSink,
) -> Result<()> {
    let mut failed = 0u32;
    let mut report = |view: &str, result: Result<()>| {
        if let Err(e) = result {
            tracing::warn!("{} crawl for {} failed: {}", view, handle, e);
            failed += 1;
        }
    };

    if config.options.info {
        report("info", run_info(api, config, handle, sink).await);
    }
    if config.options.timeline {
        report("timeline", run_timeline(api, config, handle, sink).await);
    }
    if config.options.avatar {
        report(
            "avatar",
            run_profile_images(api, config, handle, ProfileImageKind::Avatar, sink).await,
        );
    }
    if config.options.background {
        report(
            "background",
            run_profile_images(api, config, handle, ProfileImageKind::Background, sink).await,
        );
    }

    if failed > 0 {
        tracing::warn!("{} sub-view(s) failed for {}", failed, handle);
    }
    Ok(())
}
