use crate::{ComposeError, Signature, Type, VariadicSlot, plan::Correction};

/// How the outputs of one function reach the inputs of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Link {
    /// The outputs are passed on as they are.
    Direct,
    /// A trailing run of outputs must be collected into the variadic slot.
    Collect(Correction),
}

/// Checks that `returns` can be passed to a function with signature `next`.
///
/// `index` is the position of `next` in the chain and is only used to build
/// errors. For a variadic `next`, the slot rules are checked before the fixed
/// parameters are compared position by position.
pub(crate) fn link(index: usize, returns: &[Type], next: &Signature) -> Result<Link, ComposeError> {
    let params = next.params();

    let link = match next.variadic() {
        Some(slot) => variadic_link(index, returns, params.len(), slot)?,
        None if params.len() != returns.len() => {
            return Err(ComposeError::ArityMismatch {
                index,
                returns: returns.len(),
                params: params.len(),
            });
        }
        None => Link::Direct,
    };

    for (position, (expected, returned)) in params.iter().zip(returns).enumerate() {
        if expected != returned {
            return Err(ComposeError::TypeMismatch {
                index,
                position,
                returned: *returned,
                expected: *expected,
            });
        }
    }

    Ok(link)
}

/// Decides how `returns` fill `fixed` parameters followed by `slot`.
///
/// A single trailing return of the slot's sequence type is handed through
/// untouched. This is checked first, so it wins over collecting.
fn variadic_link(
    index: usize,
    returns: &[Type],
    fixed: usize,
    slot: &VariadicSlot,
) -> Result<Link, ComposeError> {
    if returns.len() == fixed + 1 && returns[fixed] == slot.sequence() {
        return Ok(Link::Direct);
    }

    if fixed > returns.len() {
        return Err(ComposeError::VariadicArityTooShort {
            index,
            returns: returns.len(),
            fixed,
        });
    }

    for (position, returned) in returns.iter().enumerate().skip(fixed) {
        if *returned != slot.element() {
            return Err(ComposeError::VariadicTypeMismatch {
                index,
                position,
                returned: *returned,
                expected: slot.element(),
            });
        }
    }

    Ok(Link::Collect(Correction::new(fixed, *slot)))
}
