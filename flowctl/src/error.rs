use anyhow::Error;
use flowgate::prelude::FlowgateError;

pub fn exit_code(err: &Error) -> i32 {
    if matches!(err.downcast_ref::<FlowgateError>(), Some(api) if api.is_auth()) {
        return 2;
    }
    1
}
