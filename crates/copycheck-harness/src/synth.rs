//! Argument synthesis
//!
//! Builds a fresh [`Arguments`] for every invocation. The source argument is
//! always a clone of the canonical buffer, so operations that write through
//! it cannot disturb later iterations or other scenarios.

use crate::fixture::Fixture;
use crate::scenario::Arguments;
use crate::shape::{DestPolicy, Shape, ShapeError};

pub fn synthesize(shape: &Shape, fixture: &Fixture) -> Result<Arguments, ShapeError> {
    shape.validate()?;

    if !shape.passes_source() {
        return Ok(Arguments::default());
    }

    let source = fixture.source(shape.source(), shape.element()).clone_array();
    let dest = match shape.dest() {
        DestPolicy::None => None,
        DestPolicy::New => Some(source.allocate_like()),
        DestPolicy::AliasSource => Some(source.clone()),
    };

    Ok(Arguments {
        source: Some(source),
        dest,
        extra: shape.extra_args().to_vec(),
    })
}
