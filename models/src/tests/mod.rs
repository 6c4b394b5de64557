mod channel;
mod dialog;
mod invoke_return;
mod versions;
