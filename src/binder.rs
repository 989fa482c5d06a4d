//! The entity binder: load-or-create resolution plus field binding.
//!
//! One binder serves one entity type. `resolve` decides whether the
//! request targets an existing record (fetched for edit) or a fresh blank
//! one; `bind` then fills the record's simple-typed fields from the
//! precedence-ordered value sources: JSON body overlay first, then form
//! values, then the query string.

use std::sync::Arc;

use tracing::debug;

use crate::descriptor::EntityDescriptor;
use crate::entity::EntityRecord;
use crate::error::{BindError, BindResult, CoerceError, FieldError};
use crate::field::{FieldDescriptor, FieldKind};
use crate::filter::KeyFilter;
use crate::overlay::BodyOverlay;
use crate::request::BindRequest;
use crate::source::EntitySource;
use crate::value::Value;

/// What to do when a JSON body fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyPolicy {
    /// Fail the bind call. The default: a client that says `json` and
    /// sends garbage gets an error, not a silent fallback.
    #[default]
    Strict,
    /// Log and ignore the body; form and query values still apply.
    Lenient,
}

/// Binder configuration, shared by every binder a provider hands out.
#[derive(Debug, Clone)]
pub struct BinderOptions {
    /// Malformed-body handling.
    pub body_policy: BodyPolicy,
    /// Separator used when joining repeated string-field values.
    pub multi_value_separator: String,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            body_policy: BodyPolicy::Strict,
            multi_value_separator: ",".to_string(),
        }
    }
}

/// Per-request binding state, threaded explicitly through the call chain.
#[derive(Debug, Default)]
pub struct BindContext {
    overlay: Option<BodyOverlay>,
}

impl BindContext {
    /// Creates an empty context for one request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The parsed body overlay, when the request carried a JSON body.
    #[must_use]
    pub fn overlay(&self) -> Option<&BodyOverlay> {
        self.overlay.as_ref()
    }
}

/// How `resolve` materialized the entity instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An existing record, loaded for edit.
    Existing(EntityRecord),
    /// A freshly created blank record.
    Created(EntityRecord),
    /// The binder does not handle this request; the host's default
    /// binding chain applies.
    Unhandled,
}

/// Which resolution path produced the bound record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    /// The record existed and was loaded for edit.
    Existing,
    /// The record was created blank.
    Created,
}

/// The result of a full bind: the record, how it was resolved, and any
/// per-field failures for the host's validation surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BindReport {
    /// The resolved and filled record.
    pub entity: EntityRecord,
    /// Whether the record was loaded or created.
    pub resolution: ResolutionKind,
    /// Per-field failures. Never fatal to the bind.
    pub field_errors: Vec<FieldError>,
}

/// Outcome of a bind call.
#[derive(Debug, Clone, PartialEq)]
pub enum BindOutcome {
    /// The binder produced a record.
    Bound(BindReport),
    /// The binder does not handle this request.
    Unhandled,
}

/// Binds requests to one entity type.
pub struct EntityBinder {
    source: Arc<dyn EntitySource>,
    options: BinderOptions,
}

impl std::fmt::Debug for EntityBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityBinder")
            .field("source", self.source.descriptor())
            .field("options", &self.options)
            .finish()
    }
}

impl EntityBinder {
    /// Creates a binder over an entity source.
    #[must_use]
    pub fn new(source: Arc<dyn EntitySource>, options: BinderOptions) -> Self {
        Self { source, options }
    }

    /// The descriptor of the bound entity type.
    #[must_use]
    pub fn descriptor(&self) -> &EntityDescriptor {
        self.source.descriptor()
    }

    /// Resolves the entity instance for a request and extracts the body
    /// overlay into the context.
    ///
    /// Resolution order: the unique-field path (route value, keyed fetch
    /// for edit), else the composite-key path (query values, equality
    /// filter), else unhandled. Lookup misses are never errors; they
    /// degrade to a blank record with defaults. Body extraction is a side
    /// effect and has no bearing on which instance is returned.
    pub fn resolve(
        &self,
        request: &BindRequest,
        ctx: &mut BindContext,
    ) -> BindResult<Resolution> {
        let descriptor = self.source.descriptor();

        let mut resolved: Option<(EntityRecord, ResolutionKind)> = None;

        if let Some(unique) = descriptor.unique_key_field() {
            let existing = match request.route_value(&unique.name) {
                Some(raw) => match unique.kind.coerce(raw) {
                    Ok(key) => self.source.find_by_key_for_edit(&key)?,
                    // A malformed route key reads as "no such record".
                    Err(err) => {
                        debug!(
                            entity = descriptor.name(),
                            field = %unique.name,
                            %err,
                            "unique key coercion failed; creating blank record"
                        );
                        None
                    }
                },
                None => None,
            };
            resolved = Some(match existing {
                Some(record) => {
                    debug!(entity = descriptor.name(), "loaded existing record for edit");
                    (record, ResolutionKind::Existing)
                }
                None => (self.source.create_blank(true)?, ResolutionKind::Created),
            });
        } else if !descriptor.primary_keys().is_empty() {
            let mut filter = KeyFilter::new();
            let mut complete = true;
            for key_field in descriptor.primary_key_fields() {
                match request.query_first(&key_field.name) {
                    Some(raw) => {
                        let value =
                            key_field
                                .kind
                                .coerce(raw)
                                .map_err(|source| BindError::KeyCoercion {
                                    field: key_field.name.clone(),
                                    source,
                                })?;
                        filter = filter.and(key_field.name.clone(), value);
                    }
                    None => {
                        complete = false;
                        break;
                    }
                }
            }

            let existing = if complete && !filter.is_empty() {
                self.source.find(&filter)?
            } else {
                None
            };
            resolved = Some(match existing {
                Some(record) => {
                    debug!(entity = descriptor.name(), "loaded existing record for edit");
                    (record, ResolutionKind::Existing)
                }
                None => (self.source.create_blank(true)?, ResolutionKind::Created),
            });
        }

        // Body extraction is independent of which path resolved, and runs
        // even when neither did.
        self.extract_overlay(request, ctx)?;

        Ok(match resolved {
            Some((record, ResolutionKind::Existing)) => Resolution::Existing(record),
            Some((record, ResolutionKind::Created)) => {
                debug!(entity = descriptor.name(), "created blank record");
                Resolution::Created(record)
            }
            None => Resolution::Unhandled,
        })
    }

    /// Resolves the entity and binds its simple-typed fields.
    pub fn bind(&self, request: &BindRequest) -> BindResult<BindOutcome> {
        let mut ctx = BindContext::new();
        let (mut entity, resolution) = match self.resolve(request, &mut ctx)? {
            Resolution::Existing(record) => (record, ResolutionKind::Existing),
            Resolution::Created(record) => (record, ResolutionKind::Created),
            Resolution::Unhandled => return Ok(BindOutcome::Unhandled),
        };

        let field_errors = self.bind_fields(&mut entity, request, &ctx);

        Ok(BindOutcome::Bound(BindReport {
            entity,
            resolution,
            field_errors,
        }))
    }

    fn extract_overlay(&self, request: &BindRequest, ctx: &mut BindContext) -> BindResult<()> {
        if !(request.is_json() && request.has_body()) {
            return Ok(());
        }
        let body = request.body().unwrap_or_default();
        match BodyOverlay::from_body(body) {
            Ok(overlay) => {
                ctx.overlay = Some(overlay);
                Ok(())
            }
            Err(err) => match self.options.body_policy {
                BodyPolicy::Strict => Err(err.into()),
                BodyPolicy::Lenient => {
                    debug!(%err, "ignoring unparseable JSON body");
                    Ok(())
                }
            },
        }
    }

    fn bind_fields(
        &self,
        entity: &mut EntityRecord,
        request: &BindRequest,
        ctx: &BindContext,
    ) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field in self.source.descriptor().fields() {
            // Complex kinds are extension/navigation properties.
            if !field.kind.is_bindable() {
                continue;
            }
            match self.resolve_field(field, request, ctx) {
                Ok(Some(value)) => entity.set(field.name.clone(), value),
                Ok(None) => {}
                Err(source) => errors.push(FieldError {
                    field: field.name.clone(),
                    source,
                }),
            }
        }
        errors
    }

    /// Per-field decision tree. `Ok(None)` leaves the field as resolution
    /// produced it.
    fn resolve_field(
        &self,
        field: &FieldDescriptor,
        request: &BindRequest,
        ctx: &BindContext,
    ) -> Result<Option<Value>, CoerceError> {
        // Clients submit empty date inputs constantly; skip instead of
        // failing validation on an empty parse. The guard consults the
        // form only and runs before every other source.
        if field.kind == FieldKind::DateTime {
            let form = request.form_values(&field.name);
            if form.is_empty() || form.iter().all(|v| v.trim().is_empty()) {
                return Ok(None);
            }
        }

        if let Some(overlay) = ctx.overlay() {
            if let Some(json) = overlay.value(&field.name) {
                return field.kind.value_from_json(json).map(Some);
            }
        }

        // Default chain: form values win over the query string.
        let values = {
            let form = request.form_values(&field.name);
            if form.is_empty() {
                request.query_values(&field.name)
            } else {
                form
            }
        };
        if values.is_empty() {
            return Ok(None);
        }

        // A repeated string field binds all submitted values, not just
        // the first.
        if field.kind == FieldKind::String && values.len() > 1 {
            return Ok(Some(Value::String(
                values.join(&self.options.multi_value_separator),
            )));
        }

        field.kind.coerce(&values[0]).map(Some)
    }
}
