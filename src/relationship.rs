//! Quoted-post detection and record linking
//!
//! A quoted post is rendered inside the quoting post's root. It is
//! extracted from its own snapshot, and the quoting post is extracted from
//! a copy of the root with the quoted subtree removed, so no field of the
//! quoted post bleeds into the outer record. Only one level is resolved;
//! a quote inside the quoted post is left in place.

use crate::dom::{DomNode, PostSnapshot, selectors};
use crate::extract::{ExtractContext, empty_data, extract_data};
use crate::identity::IdentityAssigner;
use crate::types::{Data, PlatformMeta};

/// A record together with its platform metadata, before assembly
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRecord {
    /// Core fields, id assigned
    pub data: Data,
    /// Platform metadata
    pub meta: Option<PlatformMeta>,
}

/// Records produced from one post root
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// The post that was targeted
    pub primary: ResolvedRecord,
    /// The post it quotes, as an independent sibling record
    pub quoted: Option<ResolvedRecord>,
}

/// First nested container that renders a post of its own
pub fn find_quoted<E: DomNode>(root: &E) -> Option<E> {
    root.select_all(selectors::QUOTED_CONTAINER)
        .into_iter()
        .find(|container| {
            container.select_first(selectors::USER_NAME).is_some()
                || container.select_first(selectors::AVATAR_MARKER).is_some()
        })
}

/// Extract the primary record and, if present, the quoted one
pub fn resolve(
    snapshot: &PostSnapshot,
    ctx: &ExtractContext,
    identity: &IdentityAssigner,
) -> Resolution {
    let Some(root) = snapshot.root() else {
        tracing::debug!("Snapshot has no root element");
        return Resolution {
            primary: record(empty_data(ctx.source), identity, None),
            quoted: None,
        };
    };

    let Some(quoted_root) = find_quoted(&root) else {
        return Resolution {
            primary: record(extract_data(&root, ctx), identity, None),
            quoted: None,
        };
    };

    let quoted_snapshot = PostSnapshot::from_element(quoted_root);
    let quoted = match quoted_snapshot.root() {
        Some(quoted_root) => extract_data(&quoted_root, ctx),
        None => empty_data(ctx.source),
    };
    let quoted = record(quoted, identity, None);

    let pruned = snapshot.without(quoted_root);
    let primary = match pruned.root() {
        Some(primary_root) => extract_data(&primary_root, ctx),
        None => empty_data(ctx.source),
    };
    let quoted_id = Some(quoted.data.id.clone()).filter(|id| !id.is_empty());
    let primary = record(primary, identity, quoted_id);

    tracing::debug!(
        primary = %primary.data.raw_url,
        quoted = %quoted.data.raw_url,
        "Resolved quoted post"
    );

    Resolution {
        primary,
        quoted: Some(quoted),
    }
}

fn record(
    mut data: Data,
    identity: &IdentityAssigner,
    quoted_id: Option<String>,
) -> ResolvedRecord {
    data.id = identity.assign(&data.raw_url);
    let mut meta = PlatformMeta::empty(data.source);
    if let PlatformMeta::X(x) = &mut meta {
        x.quoted_tweet_id = quoted_id;
    }
    ResolvedRecord {
        data,
        meta: Some(meta),
    }
}
