use crate::header::Header;
use std::slice::Iter;

#[derive(Debug, Clone)]
pub struct HeaderIterator<'b> {
    pub(crate) iter: Iter<'b, Header>,
}

impl<'b> Iterator for HeaderIterator<'b> {
    type Item = (&'b str, &'b str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter
            .next()
            .map(|h| (h.name.as_str(), h.value.as_str()))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'b> ExactSizeIterator for HeaderIterator<'b> {}
