// ----- standard library imports
// ----- extra library imports
// ----- local modules
pub mod echo;
pub mod people;
// ----- local imports

// ----- end imports
