mod args;
mod dispatch;
mod frame;
mod listeners;
mod marshal;
