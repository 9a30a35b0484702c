extern crate std;

mod manual;
mod stdio;
