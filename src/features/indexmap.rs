use std::hash::BuildHasher;

use indexmap::IndexMap;

use crate::{DataContext, Value};

impl<S: BuildHasher> DataContext for IndexMap<&str, Value, S> {
	#[inline]
	fn get(&self, name: &str) -> Option<&Value> {
		self.get(name)
	}
}

impl<S: BuildHasher> DataContext for IndexMap<String, Value, S> {
	#[inline]
	fn get(&self, name: &str) -> Option<&Value> {
		self.get(name)
	}
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
	use indexmap::IndexMap;
	use assert2::check;

	use crate::{render, NullResolver, Value};

	#[test]
	fn render_with_index_map() {
		let mut data: IndexMap<String, Value> = IndexMap::new();
		data.insert("name".into(), "world".into());
		data.insert("items".into(), vec![1, 2].into());
		check!(let Ok("Hello world! 12") = render("Hello {{ name }}! {{#for i in items}}{{ i }}{{/for}}", &data, &NullResolver).as_deref());

		let mut data: IndexMap<&str, Value> = IndexMap::new();
		data.insert("name", "world".into());
		check!(let Ok("Hello world!") = render("Hello {{ name }}!", &data, &NullResolver).as_deref());
	}
}
