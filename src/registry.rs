// Static dispatch tables mapping actions to controller calls.
//
// Built once at process start, read-only afterwards. Lookup has no side
// effects; the auth gate has already run by the time these are consulted.

use std::collections::HashMap;

use futures::future::BoxFuture;
use once_cell::sync::Lazy;

use crate::action::Action;
use crate::controllers::{ActionArgs, ControllerReply, Controllers};

/// GET entries take no arguments from the request.
pub type GetFn = for<'a> fn(&'a dyn Controllers) -> BoxFuture<'a, ControllerReply>;

/// POST entries receive the decoded request body as named arguments.
pub type PostFn = for<'a> fn(&'a dyn Controllers, ActionArgs) -> BoxFuture<'a, ControllerReply>;

/// Actions the auth gate admits without a token. Read-only operations the
/// front-end issues before the user has entered the admin token.
pub const NO_AUTH_ACTIONS: &[Action] = &[Action::Search, Action::Cal];

fn get_cal(c: &dyn Controllers) -> BoxFuture<'_, ControllerReply> {
    Box::pin(c.cal())
}

// Zero-argument read wrapper around the shared config controller; the POST
// entry is the write path.
fn get_config(c: &dyn Controllers) -> BoxFuture<'_, ControllerReply> {
    Box::pin(c.config(None, None))
}

fn post_add(c: &dyn Controllers, args: ActionArgs) -> BoxFuture<'_, ControllerReply> {
    Box::pin(c.add(args))
}

fn post_delete(c: &dyn Controllers, args: ActionArgs) -> BoxFuture<'_, ControllerReply> {
    Box::pin(c.delete(args))
}

fn post_search(c: &dyn Controllers, args: ActionArgs) -> BoxFuture<'_, ControllerReply> {
    Box::pin(c.search(args))
}

fn post_config(c: &dyn Controllers, args: ActionArgs) -> BoxFuture<'_, ControllerReply> {
    let name = args.get("name").and_then(|v| v.as_str()).map(str::to_string);
    let value = args.get("value").and_then(|v| v.as_str()).map(str::to_string);
    Box::pin(c.config(name, value))
}

fn post_download(c: &dyn Controllers, args: ActionArgs) -> BoxFuture<'_, ControllerReply> {
    Box::pin(c.download_prepare(args))
}

static API_MAP_GET: Lazy<HashMap<Action, GetFn>> = Lazy::new(|| {
    HashMap::from([
        (Action::Cal, get_cal as GetFn),
        (Action::Config, get_config as GetFn),
    ])
});

static API_MAP_POST: Lazy<HashMap<Action, PostFn>> = Lazy::new(|| {
    HashMap::from([
        (Action::Add, post_add as PostFn),
        (Action::Delete, post_delete as PostFn),
        (Action::Search, post_search as PostFn),
        (Action::Config, post_config as PostFn),
        (Action::Download, post_download as PostFn),
    ])
});

pub fn lookup_get(action: Action) -> Option<GetFn> {
    API_MAP_GET.get(&action).copied()
}

pub fn lookup_post(action: Action) -> Option<PostFn> {
    API_MAP_POST.get(&action).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keys() {
        assert!(lookup_get(Action::Cal).is_some());
        assert!(lookup_get(Action::Config).is_some());
        assert!(lookup_get(Action::Add).is_none());

        for action in [
            Action::Add,
            Action::Delete,
            Action::Search,
            Action::Config,
            Action::Download,
        ] {
            assert!(lookup_post(action).is_some(), "missing POST entry: {}", action);
        }
        assert!(lookup_post(Action::Cal).is_none());
    }

    #[test]
    fn test_no_auth_actions_are_registered() {
        // Every allow-listed action must be reachable through some registry
        for action in NO_AUTH_ACTIONS {
            assert!(
                lookup_get(*action).is_some() || lookup_post(*action).is_some(),
                "no registry entry for no-auth action {}",
                action
            );
        }
    }
}
