mod end_to_end;
mod rrule_oracle;
mod validation;
