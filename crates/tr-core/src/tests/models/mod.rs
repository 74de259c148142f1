mod case;
mod entity_kind;
mod missing_shared_step_policy;
