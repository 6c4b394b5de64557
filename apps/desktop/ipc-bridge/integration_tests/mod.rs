mod paths;
mod smoke;
