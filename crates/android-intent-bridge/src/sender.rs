// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intent sender: forms intents from launch requests and starts them from
// the host's current activity or application context.
//
// The sender owns both context handles behind one mutex. `send` holds that
// lock for its whole duration, so a host updating its foreground activity
// from another thread can never observe (or cause) a half-finished dispatch.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, instrument, warn};

use android_intent_core::error::{IntentError, Result};
use android_intent_core::types::{Intent, IntentFlags, IntentSpec, LaunchRequest};
use android_intent_core::BridgeConfig;

use crate::traits::IntentPlatform;
use crate::utils;

/// The two context slots the host keeps up to date.
#[derive(Debug, Clone)]
pub struct DispatchContext<C> {
    /// Foreground activity, used in preference to the application context
    /// so launched activities join its task.
    pub activity: Option<C>,
    /// Application context. Must be set before anything can be sent.
    pub application: Option<C>,
}

impl<C> Default for DispatchContext<C> {
    fn default() -> Self {
        Self {
            activity: None,
            application: None,
        }
    }
}

/// Which context an intent was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchSource {
    Activity,
    /// Application context; the intent carries `ACTIVITY_NEW_TASK`.
    ApplicationContext,
}

/// Outcome of a successful [`IntentSender::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    /// The intent exactly as it was handed to `startActivity`.
    pub intent: Intent,
    pub source: LaunchSource,
    /// The requested package did not resolve and was removed, making the
    /// intent implicit.
    pub package_dropped: bool,
    /// Result of the handler check, when one ran: the explicit-package
    /// resolution for generic intents, the post-launch query for file-open
    /// intents.
    pub handler_available: Option<bool>,
}

/// An intent built from a spec, before dispatch-side flags are applied.
struct Prepared {
    intent: Intent,
    package_dropped: bool,
    handler_available: Option<bool>,
}

/// Forms and launches intents on behalf of the host.
pub struct IntentSender<P: IntentPlatform> {
    platform: P,
    config: BridgeConfig,
    context: Mutex<DispatchContext<P::Context>>,
}

impl<P: IntentPlatform> IntentSender<P> {
    /// Create a sender with no contexts attached yet.
    pub fn new(platform: P, config: BridgeConfig) -> Self {
        Self::with_context(platform, config, DispatchContext::default())
    }

    pub fn with_context(
        platform: P,
        config: BridgeConfig,
        context: DispatchContext<P::Context>,
    ) -> Self {
        Self {
            platform,
            config,
            context: Mutex::new(context),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Check a configuration that arrived after construction. It is never
    /// applied; returns `true` (and warns) when it differs from the one in
    /// use.
    pub fn ignore_config(&self, config: &BridgeConfig) -> bool {
        let differs = self.config != *config;
        if differs {
            warn!(
                installed = ?self.config,
                incoming = ?config,
                "bridge already initialised; new configuration ignored"
            );
        } else {
            debug!("bridge already initialised; configuration unchanged");
        }
        differs
    }

    /// Replace the foreground activity (`None` when it detaches).
    pub fn set_activity(&self, activity: Option<P::Context>) {
        debug!(attached = activity.is_some(), "activity updated");
        self.lock().activity = activity;
    }

    /// Replace the application context.
    pub fn set_application_context(&self, application: Option<P::Context>) {
        debug!(attached = application.is_some(), "application context updated");
        self.lock().application = application;
    }

    fn lock(&self) -> MutexGuard<'_, DispatchContext<P::Context>> {
        self.context.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Build the intent described by `request` and start it.
    ///
    /// Starts exactly one activity on success and none on error. Without an
    /// application context nothing is started and
    /// [`IntentError::MissingApplicationContext`] is returned.
    #[instrument(skip_all)]
    pub fn send(&self, request: &LaunchRequest) -> Result<Dispatch> {
        let context = self.lock();
        let Some(application) = context.application.as_ref() else {
            error!("trying to send an intent before the application context was initialised");
            return Err(IntentError::MissingApplicationContext);
        };

        match request {
            LaunchRequest::OpenFile { path } => self.send_open_file(application, path),
            LaunchRequest::Intent(spec) => {
                self.send_intent(context.activity.as_ref(), application, spec)
            }
        }
    }

    /// Whether `request` would find a handler if sent now.
    #[instrument(skip_all)]
    pub fn can_resolve(&self, request: &LaunchRequest) -> Result<bool> {
        let context = self.lock();
        let Some(application) = context.application.as_ref() else {
            error!("trying to resolve an intent before the application context was initialised");
            return Err(IntentError::MissingApplicationContext);
        };

        let intent = match request {
            LaunchRequest::OpenFile { path } => {
                utils::open_file_intent(&self.platform, &self.config, application, path)?
            }
            LaunchRequest::Intent(spec) => self.prepare(application, spec)?.intent,
        };
        utils::validate_intent(&self.platform, application, &intent)
    }

    fn send_open_file(&self, application: &P::Context, path: &Path) -> Result<Dispatch> {
        let intent = utils::open_file_intent(&self.platform, &self.config, application, path)?;

        info!(%intent, "sending file-open intent");
        self.platform.start_activity(application, &intent)?;

        // Checked after the launch; a missing handler is reported, not fatal.
        let handler_available = match utils::validate_intent(&self.platform, application, &intent) {
            Ok(found) => {
                if !found {
                    warn!(path = %path.display(), "no installed activity can open this file");
                }
                Some(found)
            }
            Err(e) => {
                warn!(error = %e, "could not query handlers for file-open intent");
                None
            }
        };

        Ok(Dispatch {
            intent,
            source: LaunchSource::ApplicationContext,
            package_dropped: false,
            handler_available,
        })
    }

    fn send_intent(
        &self,
        activity: Option<&P::Context>,
        application: &P::Context,
        spec: &IntentSpec,
    ) -> Result<Dispatch> {
        let Prepared {
            mut intent,
            package_dropped,
            handler_available,
        } = self.prepare(application, spec)?;

        let source = match activity {
            Some(activity) => {
                debug!(%intent, "sending intent from activity");
                self.platform.start_activity(activity, &intent)?;
                LaunchSource::Activity
            }
            None => {
                intent.add_flags(IntentFlags::ACTIVITY_NEW_TASK);
                debug!(%intent, "sending intent from application context");
                self.platform.start_activity(application, &intent)?;
                LaunchSource::ApplicationContext
            }
        };

        Ok(Dispatch {
            intent,
            source,
            package_dropped,
            handler_available,
        })
    }

    /// Form the intent for `spec`, downgrading an unresolvable explicit
    /// package to an implicit intent.
    fn prepare(&self, application: &P::Context, spec: &IntentSpec) -> Result<Prepared> {
        if spec.action.is_empty() {
            return Err(IntentError::InvalidRequest("intent action is empty".into()));
        }

        let mut intent = Intent::new(spec.action.as_str());
        if let Some(flags) = spec.flags {
            intent.add_flags(flags);
        }
        if let Some(category) = non_empty(&spec.category) {
            intent.add_category(category);
        }
        if let Some(data) = &spec.data {
            intent.set_data(data.as_str());
        }
        if let Some(extras) = &spec.extras {
            intent.put_extras(extras);
        }

        let mut package_dropped = false;
        let mut handler_available = None;
        if let Some(package) = non_empty(&spec.package) {
            intent.set_package(Some(package.to_owned()));
            if spec.component.is_some() {
                intent.set_component(spec.component.clone());
            }

            match self.platform.resolve_activity(application, &intent)? {
                Some(activity) => {
                    debug!(%activity, "explicit intent resolved");
                    handler_available = Some(true);
                }
                None => {
                    info!(package, "cannot resolve explicit intent; ignoring package");
                    intent.set_package(None);
                    package_dropped = true;
                    handler_available = Some(false);
                }
            }
        }

        Ok(Prepared {
            intent,
            package_dropped,
            handler_available,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
