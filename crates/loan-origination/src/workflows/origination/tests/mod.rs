mod common;

mod decision;
